//! Defines the endpoint for removing a member from a family.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::{FamilyId, MemberId},
    family::{FamilyWithMembers, core::get_family_with_members},
    member::delete_member,
};

/// The state needed to remove a member from a family.
#[derive(Debug, Clone)]
pub struct RemoveMemberState {
    /// The database connection for managing families.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RemoveMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for removing a member from a family, returns the
/// updated family.
///
/// The member's transaction history is removed along with the member.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn remove_member_endpoint(
    State(state): State<RemoveMemberState>,
    Path((family_id, member_id)): Path<(FamilyId, MemberId)>,
) -> Result<Json<FamilyWithMembers>, Error> {
    let connection = state.db_connection.lock().unwrap();

    delete_member(family_id, member_id, &connection)?;

    Ok(Json(get_family_with_members(family_id, &connection)?))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{Error, db::initialize, family::create_family, member::insert_member};

    use super::{RemoveMemberState, remove_member_endpoint};

    fn get_test_state() -> RemoveMemberState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        RemoveMemberState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn removes_member_and_returns_updated_family() {
        let state = get_test_state();
        let (family_id, member_id) = {
            let connection = state.db_connection.lock().unwrap();
            let family = create_family("Doe", None, &connection).unwrap();
            let member = insert_member(family.id, "Alice", "child", None, &connection).unwrap();
            (family.id, member.id)
        };

        let Json(updated) = remove_member_endpoint(State(state), Path((family_id, member_id)))
            .await
            .expect("expected member to be removed");

        assert_eq!(updated.members, vec![]);
    }

    #[tokio::test]
    async fn fails_for_unknown_member() {
        let state = get_test_state();
        let family_id = {
            let connection = state.db_connection.lock().unwrap();
            create_family("Doe", None, &connection).unwrap().id
        };

        let result = remove_member_endpoint(State(state), Path((family_id, 42))).await;

        assert_eq!(result.unwrap_err(), Error::MemberNotFound(42));
    }
}
