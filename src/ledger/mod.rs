//! The chore bank ledger.
//!
//! This module contains everything related to the money side of the
//! tracker:
//! - The `BankTransaction` model and the recorder that writes a
//!   transaction and the matching balance adjustment as one unit
//! - The expander that materializes a recurring transaction into
//!   backdated entries
//! - The aggregator that recomputes member balances from the transaction
//!   history
//! - Endpoint handlers for the ledger operations

pub(crate) mod core;
mod balances_endpoint;
mod record_recurring_endpoint;
mod record_transaction_endpoint;
mod schedule;
mod transactions_endpoint;

pub use balances_endpoint::get_balances_endpoint;
pub use core::{
    BankTransaction, BankTransactionBuilder, MemberBalance, create_transaction_table,
    family_balances, member_transactions, record_recurring_transactions, record_transaction,
};
pub use record_recurring_endpoint::record_recurring_endpoint;
pub use record_transaction_endpoint::record_transaction_endpoint;
pub use schedule::{Interval, nth_occurrence, occurrences_through};
pub use transactions_endpoint::get_transactions_endpoint;
