//! Defines the endpoint for setting a member's monthly recurring expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::MemberId,
    member::{Member, core::get_member, core::set_recurring_expenses},
    money::Money,
};

/// The state needed to update a member's recurring expenses.
#[derive(Debug, Clone)]
pub struct SetRecurringExpensesState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetRecurringExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for setting recurring expenses.
#[derive(Debug, Deserialize)]
pub struct RecurringExpensesForm {
    /// The monthly expense amount in dollars.
    pub recurring_expenses: f64,
}

/// A route handler for setting a member's monthly recurring expense
/// amount, returns the updated member.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn set_recurring_expenses_endpoint(
    State(state): State<SetRecurringExpensesState>,
    Path(member_id): Path<MemberId>,
    Json(form): Json<RecurringExpensesForm>,
) -> Result<Json<Member>, Error> {
    let amount = Money::from_dollars(form.recurring_expenses)?;

    let connection = state.db_connection.lock().unwrap();

    set_recurring_expenses(member_id, amount, &connection)?;

    Ok(Json(get_member(member_id, &connection)?))
}
