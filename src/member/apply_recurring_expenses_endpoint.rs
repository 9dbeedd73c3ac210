//! Defines the endpoint for deducting a member's monthly recurring
//! expenses from their chore bank.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::MemberId,
    ledger::{BankTransaction, Interval, core::today_utc, record_transaction},
    member::core::get_member,
};

/// The state needed to apply a member's recurring expenses.
#[derive(Debug, Clone)]
pub struct ApplyRecurringExpensesState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ApplyRecurringExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deducting a member's recurring expenses.
///
/// Records the deduction as an ordinary ledger transaction so it shows up
/// in the member's history and adjusts their chore bank atomically.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn apply_recurring_expenses_endpoint(
    State(state): State<ApplyRecurringExpensesState>,
    Path(member_id): Path<MemberId>,
) -> Result<(StatusCode, Json<BankTransaction>), Error> {
    let connection = state.db_connection.lock().unwrap();

    let member = get_member(member_id, &connection)?;

    if member.recurring_expenses.is_zero() {
        return Err(Error::NoRecurringExpenses);
    }

    let entry = record_transaction(
        BankTransaction::build(
            member_id,
            -member.recurring_expenses,
            "Monthly recurring expenses",
        )
        .recurrence(today_utc(), Interval::Monthly),
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(entry)))
}
