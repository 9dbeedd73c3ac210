//! Defines the endpoint for adding a member to an existing family.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::FamilyId,
    family::{FamilyWithMembers, core::get_family_with_members, core::require_family},
    member::{DEFAULT_ROLE, NewMember, insert_member},
};

/// The state needed to add a member to a family.
#[derive(Debug, Clone)]
pub struct AddMemberState {
    /// The database connection for managing families.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for adding a member to a family, returns the updated
/// family.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn add_member_endpoint(
    State(state): State<AddMemberState>,
    Path(family_id): Path<FamilyId>,
    Json(form): Json<NewMember>,
) -> Result<Json<FamilyWithMembers>, Error> {
    let connection = state.db_connection.lock().unwrap();

    require_family(family_id, &connection)?;
    insert_member(
        family_id,
        &form.name,
        form.role.as_deref().unwrap_or(DEFAULT_ROLE),
        form.phone.as_deref(),
        &connection,
    )?;

    Ok(Json(get_family_with_members(family_id, &connection)?))
}
