//! Defines the endpoint for reading a family's chore bank balances.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::FamilyId,
    ledger::{MemberBalance, core::family_balances},
};

/// The state needed to read balances.
#[derive(Debug, Clone)]
pub struct BalancesState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalancesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for reading the chore bank balance of every member of
/// a family.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_balances_endpoint(
    State(state): State<BalancesState>,
    Path(family_id): Path<FamilyId>,
) -> Result<Json<Vec<MemberBalance>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    Ok(Json(family_balances(family_id, &connection)?))
}
