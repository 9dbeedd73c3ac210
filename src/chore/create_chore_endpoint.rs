//! Defines the endpoint for creating a chore.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    chore::{Chore, NewChore, core::create_chore},
    database_id::FamilyId,
};

/// The state needed to create a chore.
#[derive(Debug, Clone)]
pub struct CreateChoreState {
    /// The database connection for managing chores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateChoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a chore for a family.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_chore_endpoint(
    State(state): State<CreateChoreState>,
    Path(family_id): Path<FamilyId>,
    Json(form): Json<NewChore>,
) -> Result<(StatusCode, Json<Chore>), Error> {
    let connection = state.db_connection.lock().unwrap();

    let chore = create_chore(family_id, &form, &connection)?;

    Ok((StatusCode::CREATED, Json(chore)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, chore::NewChore, db::initialize, family::create_family, ledger::Interval,
        money::Money,
    };

    use super::{CreateChoreState, create_chore_endpoint};

    fn get_test_state() -> CreateChoreState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateChoreState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn new_chore_form() -> NewChore {
        NewChore {
            name: "Dishes".to_owned(),
            description: None,
            due_date: date!(2024 - 06 - 01),
            schedule: Interval::Weekly,
            reward: Money::from_cents(150),
            assigned_member_ids: vec![],
        }
    }

    #[tokio::test]
    async fn creates_chore() {
        let state = get_test_state();
        let family_id = {
            let connection = state.db_connection.lock().unwrap();
            create_family("Doe", None, &connection).unwrap().id
        };

        let (status, Json(chore)) =
            create_chore_endpoint(State(state), Path(family_id), Json(new_chore_form()))
                .await
                .expect("expected chore to be created");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(chore.name, "Dishes");
        assert_eq!(chore.reward, Money::from_cents(150));
    }

    #[tokio::test]
    async fn fails_for_unknown_family() {
        let state = get_test_state();

        let result = create_chore_endpoint(State(state), Path(42), Json(new_chore_form())).await;

        assert_eq!(result.unwrap_err(), Error::FamilyNotFound(42));
    }
}
