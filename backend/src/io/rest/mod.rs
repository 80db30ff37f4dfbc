//! # REST API Interface Layer
//!
//! HTTP endpoints for account and transaction records. Handlers translate
//! between JSON and the domain services and turn every failure into an
//! [`error::ApiError`]; no business logic lives here.

pub mod account_apis;
pub mod error;
pub mod transaction_apis;

pub use error::ApiError;
