//! Defines the endpoint for editing a chore and marking it completed.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    chore::{
        Chore, ChoreUpdate,
        core::{complete_chore, reopen_chore, update_chore},
    },
    database_id::{ChoreId, MemberId},
};

/// The state needed to update a chore.
#[derive(Debug, Clone)]
pub struct UpdateChoreState {
    /// The database connection for managing chores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateChoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for editing a chore.
#[derive(Debug, Deserialize)]
pub struct UpdateChoreForm {
    /// The replacement values for the chore's editable fields.
    #[serde(flatten)]
    pub chore: ChoreUpdate,
    /// Set to mark the chore completed or to reopen it.
    #[serde(default)]
    pub completed: Option<bool>,
    /// The member who completed the chore; required when `completed` is
    /// set to true.
    #[serde(default)]
    pub member_id: Option<MemberId>,
}

/// A route handler for editing a chore.
///
/// Marking the chore completed pays its reward into the completing
/// member's chore bank through the ledger, exactly once.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_chore_endpoint(
    State(state): State<UpdateChoreState>,
    Path(chore_id): Path<ChoreId>,
    Json(form): Json<UpdateChoreForm>,
) -> Result<Json<Chore>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let chore = update_chore(chore_id, &form.chore, &connection)?;

    let chore = match form.completed {
        Some(true) => {
            let member_id = form.member_id.ok_or(Error::MissingCompletingMember)?;
            complete_chore(chore_id, member_id, &connection)?
        }
        Some(false) => reopen_chore(chore_id, &connection)?,
        None => chore,
    };

    Ok(Json(chore))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        chore::{ChoreUpdate, NewChore, core::create_chore},
        database_id::{ChoreId, MemberId},
        db::initialize,
        family::create_family,
        ledger::{Interval, member_transactions},
        member::insert_member,
        money::Money,
    };

    use super::{UpdateChoreForm, UpdateChoreState, update_chore_endpoint};

    fn get_test_state() -> (UpdateChoreState, ChoreId, MemberId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let family = create_family("Doe", None, &conn).unwrap();
        let member = insert_member(family.id, "Alice", "child", None, &conn).unwrap();
        let chore = create_chore(
            family.id,
            &NewChore {
                name: "Dishes".to_owned(),
                description: None,
                due_date: date!(2024 - 06 - 01),
                schedule: Interval::Weekly,
                reward: Money::from_cents(150),
                assigned_member_ids: vec![member.id],
            },
            &conn,
        )
        .unwrap();

        let state = UpdateChoreState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, chore.id, member.id)
    }

    fn update_form() -> ChoreUpdate {
        ChoreUpdate {
            name: "Dishes".to_owned(),
            description: None,
            due_date: date!(2024 - 06 - 01),
            schedule: Interval::Weekly,
            reward: Money::from_cents(150),
        }
    }

    #[tokio::test]
    async fn completing_pays_the_reward_through_the_ledger() {
        let (state, chore_id, member_id) = get_test_state();

        let Json(chore) = update_chore_endpoint(
            State(state.clone()),
            Path(chore_id),
            Json(UpdateChoreForm {
                chore: update_form(),
                completed: Some(true),
                member_id: Some(member_id),
            }),
        )
        .await
        .expect("expected chore to be completed");

        assert!(chore.completed);

        let connection = state.db_connection.lock().unwrap();
        let history = member_transactions(member_id, &connection).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, Money::from_cents(150));
    }

    #[tokio::test]
    async fn completing_without_a_member_is_rejected() {
        let (state, chore_id, _) = get_test_state();

        let result = update_chore_endpoint(
            State(state),
            Path(chore_id),
            Json(UpdateChoreForm {
                chore: update_form(),
                completed: Some(true),
                member_id: None,
            }),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::MissingCompletingMember);
    }

    #[tokio::test]
    async fn reopening_clears_the_completion_flag() {
        let (state, chore_id, member_id) = get_test_state();

        update_chore_endpoint(
            State(state.clone()),
            Path(chore_id),
            Json(UpdateChoreForm {
                chore: update_form(),
                completed: Some(true),
                member_id: Some(member_id),
            }),
        )
        .await
        .unwrap();

        let Json(chore) = update_chore_endpoint(
            State(state),
            Path(chore_id),
            Json(UpdateChoreForm {
                chore: update_form(),
                completed: Some(false),
                member_id: None,
            }),
        )
        .await
        .unwrap();

        assert!(!chore.completed);
    }
}
