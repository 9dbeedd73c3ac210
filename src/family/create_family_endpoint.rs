//! Defines the endpoint for creating a family with its initial members.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    family::{FamilyWithMembers, core::create_family_with_members},
    member::NewMember,
};

/// The state needed to create a family.
#[derive(Debug, Clone)]
pub struct CreateFamilyState {
    /// The database connection for managing families.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateFamilyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a family.
#[derive(Debug, Deserialize)]
pub struct CreateFamilyForm {
    /// The display name of the family.
    pub name: String,
    /// An optional short join-code.
    #[serde(default)]
    pub short_code: Option<String>,
    /// The initial members of the family.
    #[serde(default)]
    pub members: Vec<NewMember>,
}

/// A route handler for creating a new family with its initial members.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_family_endpoint(
    State(state): State<CreateFamilyState>,
    Json(form): Json<CreateFamilyForm>,
) -> Result<(StatusCode, Json<FamilyWithMembers>), Error> {
    let connection = state.db_connection.lock().unwrap();

    let created = create_family_with_members(
        &form.name,
        form.short_code.as_deref(),
        &form.members,
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(created)))
}
