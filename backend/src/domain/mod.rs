//! # Domain Module
//!
//! Record operations for accounts and transactions. Services sit between the
//! REST handlers and the repositories; they hold no state of their own beyond
//! the shared store handle.
//!
//! Totals are computed in the application tier: every record is loaded and
//! the numeric field summed. Records with no value for the field count as 0,
//! and an empty collection sums to 0.

pub mod account_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use transaction_service::TransactionService;

/// Sum the present values, treating absent ones as zero
pub(crate) fn sum_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().fold(0.0, |total, v| total + v)
}
