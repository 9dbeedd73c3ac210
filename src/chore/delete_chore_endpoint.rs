//! Defines the endpoint for deleting a chore.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, chore::core::delete_chore, database_id::ChoreId};

/// The state needed to delete a chore.
#[derive(Debug, Clone)]
pub struct DeleteChoreState {
    /// The database connection for managing chores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteChoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a chore.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_chore_endpoint(
    State(state): State<DeleteChoreState>,
    Path(chore_id): Path<ChoreId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().unwrap();

    delete_chore(chore_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
