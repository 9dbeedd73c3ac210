/*! Defines the database schema setup for the application. */

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, chore::create_chore_tables, family::create_family_table,
    ledger::create_transaction_table, member::create_member_table,
};

/// Create the tables for the domain models if they do not exist.
///
/// Also turns on foreign key enforcement so that removing a member or a
/// family cascades to its dependent rows.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // This pragma is a no-op inside a transaction, so set it first.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_family_table(&transaction)?;
    create_member_table(&transaction)?;
    create_chore_tables(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection));
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(Ok(()), initialize(&connection));
    }
}
