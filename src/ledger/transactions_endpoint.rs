//! Defines the endpoint for listing a member's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::MemberId,
    ledger::{BankTransaction, core::member_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing a member's transactions, newest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    Path(member_id): Path<MemberId>,
) -> Result<Json<Vec<BankTransaction>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    Ok(Json(member_transactions(member_id, &connection)?))
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
        db::initialize,
        family::create_family,
        ledger::{BankTransaction, record_transaction},
        member::insert_member,
        money::Money,
    };

    use super::{TransactionsState, get_transactions_endpoint};

    fn get_test_state() -> TransactionsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn lists_transactions_newest_first() {
        let state = get_test_state();
        let member_id = {
            let connection = state.db_connection.lock().unwrap();
            let family = create_family("Doe", None, &connection).unwrap();
            let member = insert_member(family.id, "Alice", "child", None, &connection).unwrap();
            record_transaction(
                BankTransaction::build(member.id, Money::from_cents(500), "chores")
                    .created_on(date!(2024 - 05 - 01)),
                &connection,
            )
            .unwrap();
            record_transaction(
                BankTransaction::build(member.id, Money::from_cents(-250), "snack")
                    .created_on(date!(2024 - 05 - 02)),
                &connection,
            )
            .unwrap();
            member.id
        };

        let Json(transactions) = get_transactions_endpoint(State(state), Path(member_id))
            .await
            .expect("expected transactions to be listed");

        let descriptions: Vec<_> = transactions
            .iter()
            .map(|entry| entry.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["snack", "chores"]);
    }

    #[tokio::test]
    async fn fails_for_unknown_member() {
        let state = get_test_state();

        let result = get_transactions_endpoint(State(state), Path(42)).await;

        assert_eq!(result.unwrap_err(), Error::MemberNotFound(42));
    }
}
