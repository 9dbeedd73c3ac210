//! Defines the endpoint for fetching a family with its members and chores.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    chore::{Chore, list_family_chores},
    database_id::FamilyId,
    family::{Family, core::get_family},
    member::{Member, list_family_members},
};

/// The state needed to fetch a family.
#[derive(Debug, Clone)]
pub struct GetFamilyState {
    /// The database connection for managing families.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetFamilyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A family with everything the dashboard needs to render it.
#[derive(Debug, Serialize)]
pub struct FamilyDetails {
    /// The family itself.
    #[serde(flatten)]
    pub family: Family,
    /// The family's members in member order.
    pub members: Vec<Member>,
    /// The family's chores with their assigned member IDs.
    pub chores: Vec<Chore>,
}

/// A route handler for fetching a family with its members and chores.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_family_endpoint(
    State(state): State<GetFamilyState>,
    Path(family_id): Path<FamilyId>,
) -> Result<Json<FamilyDetails>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let family = get_family(family_id, &connection)?;
    let members = list_family_members(family_id, &connection)?;
    let chores = list_family_chores(family_id, &connection)?;

    Ok(Json(FamilyDetails {
        family,
        members,
        chores,
    }))
}
