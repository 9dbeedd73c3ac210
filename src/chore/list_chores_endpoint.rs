//! Defines the endpoint for listing a family's chores.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    chore::{Chore, core::list_family_chores},
    database_id::FamilyId,
};

/// The state needed to list chores.
#[derive(Debug, Clone)]
pub struct ListChoresState {
    /// The database connection for managing chores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListChoresState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing a family's chores.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_chores_endpoint(
    State(state): State<ListChoresState>,
    Path(family_id): Path<FamilyId>,
) -> Result<Json<Vec<Chore>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    Ok(Json(list_family_chores(family_id, &connection)?))
}
