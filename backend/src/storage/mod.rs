//! # Storage Module
//!
//! Persistence for account and transaction records. A single
//! [`DbConnection`] is opened at startup and shared by every repository.
//! Records live in two independent tables with no cross-table constraints;
//! every non-identity column is nullable.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{AccountRepository, TransactionRepository};
