//! Defines the endpoint for recording a one-off transaction against a
//! member's chore bank.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::MemberId,
    ledger::{BankTransaction, core::record_transaction},
    money::Money,
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct RecordTransactionState {
    /// The database connection for writing to the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionForm {
    /// The signed amount in dollars; positive for earnings, negative for
    /// expenses.
    pub amount: f64,
    /// Text detailing the transaction.
    pub description: String,
}

/// A route handler for recording a transaction against a member's chore
/// bank.
///
/// The transaction row and the balance adjustment are written as one
/// unit; the amount is validated before anything is written.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn record_transaction_endpoint(
    State(state): State<RecordTransactionState>,
    Path(member_id): Path<MemberId>,
    Json(form): Json<RecordTransactionForm>,
) -> Result<(StatusCode, Json<BankTransaction>), Error> {
    let amount = Money::from_dollars(form.amount)?;

    let connection = state.db_connection.lock().unwrap();

    let entry = record_transaction(
        BankTransaction::build(member_id, amount, &form.description),
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(entry)))
}
