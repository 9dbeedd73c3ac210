//! Defines the core data models and database queries for the chore bank
//! ledger.
//!
//! Every operation that creates a transaction also adjusts the owning
//! member's cached `chore_bank` by the same amount inside one SQL
//! transaction, so the cached balance and the transaction history always
//! agree.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{FamilyId, MemberId, TransactionId},
    family::require_family,
    ledger::schedule::{Interval, occurrences_through},
    member::require_member,
    money::Money,
};

// ============================================================================
// MODELS
// ============================================================================

/// A single credit or debit against a member's chore bank.
///
/// Positive amounts are earnings, negative amounts are expenses.
/// Transactions are immutable once recorded; they are only ever inserted,
/// never updated.
///
/// To create a new `BankTransaction`, use [BankTransaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankTransaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The member whose chore bank this transaction belongs to.
    pub member_id: MemberId,
    /// The signed amount of money earned or spent.
    pub amount: Money,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The date the transaction is recorded under.
    pub created_on: Date,
    /// The first date of the recurring series this entry belongs to, if
    /// any.
    pub start_date: Option<Date>,
    /// The recurrence the entry was created with.
    pub interval: Interval,
}

impl BankTransaction {
    /// Create a new transaction for `member_id`.
    ///
    /// Shortcut for [BankTransactionBuilder] for discoverability.
    pub fn build(member_id: MemberId, amount: Money, description: &str) -> BankTransactionBuilder {
        BankTransactionBuilder {
            member_id,
            amount,
            description: description.to_owned(),
            created_on: None,
            start_date: None,
            interval: Interval::OneTime,
        }
    }
}

/// A builder for creating [BankTransaction] instances.
///
/// Defaults to a one-time transaction dated today. Pass the finished
/// builder to [record_transaction] to persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransactionBuilder {
    /// The member whose chore bank the transaction belongs to.
    pub member_id: MemberId,
    /// The signed amount of the transaction.
    pub amount: Money,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The date to record the transaction under, today if not set.
    pub created_on: Option<Date>,
    /// The start date of the recurring series the entry belongs to.
    pub start_date: Option<Date>,
    /// The recurrence the entry is labelled with.
    pub interval: Interval,
}

impl BankTransactionBuilder {
    /// Set the date the transaction is recorded under.
    pub fn created_on(mut self, date: Date) -> Self {
        self.created_on = Some(date);
        self
    }

    /// Set the recurrence metadata for the transaction.
    pub fn recurrence(mut self, start_date: Date, interval: Interval) -> Self {
        self.start_date = Some(start_date);
        self.interval = interval;
        self
    }
}

/// A member's chore bank balance, recomputed from the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBalance {
    /// The ID of the member.
    pub member_id: MemberId,
    /// The display name of the member.
    pub name: String,
    /// The current balance.
    pub balance: Money,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the bank transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS bank_transaction (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            description TEXT NOT NULL,
            created_on TEXT NOT NULL,
            start_date TEXT,
            interval TEXT NOT NULL DEFAULT 'one-time',
            FOREIGN KEY(member_id) REFERENCES member(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bank_transaction_member
            ON bank_transaction(member_id, created_on);",
    )?;

    Ok(())
}

/// Record a transaction and adjust the member's chore bank as one unit.
///
/// Both the insert and the balance adjustment happen inside a single SQL
/// transaction: either the ledger gains the entry and the cached balance
/// moves by the same amount, or neither happens.
///
/// # Errors
/// This function will return a:
/// - [Error::MemberNotFound] if the builder's member ID does not refer to
///   a member, with nothing written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn record_transaction(
    builder: BankTransactionBuilder,
    connection: &Connection,
) -> Result<BankTransaction, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    apply_bank_delta(builder.member_id, builder.amount, &sql_transaction)?;
    let entry = insert_transaction_row(builder, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(entry)
}

/// Materialize a recurring transaction as one entry per occurrence from
/// `start_date` through `today`, inclusive.
///
/// All generated entries and a single chore bank adjustment of
/// `amount × N` are applied inside one SQL transaction. A start date in
/// the future yields an empty list and leaves the chore bank unchanged,
/// which is a successful no-op rather than an error.
//
// TODO: derive an idempotency key from (member, amount, start date,
// interval) and reject replays; calling this twice with the same
// arguments currently materializes the whole series twice.
///
/// # Errors
/// This function will return a:
/// - [Error::UnsupportedInterval] if `interval` is not daily, weekly or
///   monthly, before anything is generated,
/// - or [Error::MemberNotFound] if `member_id` does not refer to a
///   member, with nothing written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn record_recurring_transactions(
    member_id: MemberId,
    amount: Money,
    description: &str,
    start_date: Date,
    interval: Interval,
    today: Date,
    connection: &Connection,
) -> Result<Vec<BankTransaction>, Error> {
    let interval = interval.require_recurring()?;
    let dates = occurrences_through(start_date, interval, today);

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    // Applied even for an empty series so an unknown member is still
    // reported as not found.
    apply_bank_delta(member_id, amount.times(dates.len() as i64), &sql_transaction)?;

    let mut entries = Vec::with_capacity(dates.len());

    for date in dates {
        let builder = BankTransaction::build(member_id, amount, description)
            .created_on(date)
            .recurrence(start_date, interval);

        entries.push(insert_transaction_row(builder, &sql_transaction)?);
    }

    sql_transaction.commit()?;

    Ok(entries)
}

/// Retrieve a member's transactions, newest first.
///
/// # Errors
/// This function will return a:
/// - [Error::MemberNotFound] if `member_id` does not refer to a member,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn member_transactions(
    member_id: MemberId,
    connection: &Connection,
) -> Result<Vec<BankTransaction>, Error> {
    require_member(member_id, connection)?;

    connection
        .prepare(
            "SELECT id, member_id, amount, description, created_on, start_date, interval
             FROM bank_transaction
             WHERE member_id = :member_id
             ORDER BY created_on DESC, id DESC",
        )?
        .query_map(&[(":member_id", &member_id)], map_transaction_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Compute the chore bank balance of every member of a family, in member
/// order.
///
/// Balances are recomputed from the transaction history with exact
/// integer arithmetic. The cached `chore_bank` field is expected to match
/// the recomputed value at all times; a mismatch means some write skipped
/// the ledger, so it is logged as a warning.
///
/// # Errors
/// This function will return a:
/// - [Error::FamilyNotFound] if `family_id` does not refer to a family,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn family_balances(
    family_id: FamilyId,
    connection: &Connection,
) -> Result<Vec<MemberBalance>, Error> {
    require_family(family_id, connection)?;

    let rows: Vec<(MemberId, String, Money, Money)> = connection
        .prepare(
            "SELECT m.id, m.name, m.chore_bank, COALESCE(SUM(t.amount), 0)
             FROM member m
             LEFT JOIN bank_transaction t ON t.member_id = m.id
             WHERE m.family_id = :family_id
             GROUP BY m.id, m.name, m.chore_bank
             ORDER BY m.id",
        )?
        .query_map(&[(":family_id", &family_id)], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<Result<_, _>>()?;

    let balances = rows
        .into_iter()
        .map(|(member_id, name, cached, computed)| {
            if cached != computed {
                tracing::warn!(
                    "member {member_id} has a cached chore bank of {cached} but a transaction \
                     history totalling {computed}"
                );
            }

            MemberBalance {
                member_id,
                name,
                balance: computed,
            }
        })
        .collect();

    Ok(balances)
}

/// Insert a transaction row without touching the member's cached balance.
///
/// Callers must pair this with [apply_bank_delta] inside the same SQL
/// transaction to keep the cached balance consistent with the history.
pub(crate) fn insert_transaction_row(
    builder: BankTransactionBuilder,
    connection: &Connection,
) -> Result<BankTransaction, Error> {
    let created_on = builder.created_on.unwrap_or_else(today_utc);

    let entry = connection
        .prepare(
            "INSERT INTO bank_transaction
                 (member_id, amount, description, created_on, start_date, interval)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, member_id, amount, description, created_on, start_date, interval",
        )?
        .query_row(
            (
                builder.member_id,
                builder.amount,
                builder.description,
                created_on,
                builder.start_date,
                builder.interval,
            ),
            map_transaction_row,
        )?;

    Ok(entry)
}

/// Adjust a member's cached chore bank balance by `delta`.
///
/// # Errors
/// Returns [Error::MemberNotFound] if `member_id` does not refer to a
/// member.
pub(crate) fn apply_bank_delta(
    member_id: MemberId,
    delta: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE member SET chore_bank = chore_bank + ?1 WHERE id = ?2",
        (delta, member_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::MemberNotFound(member_id));
    }

    Ok(())
}

/// Today's date in UTC.
pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Map a database row to a [BankTransaction].
fn map_transaction_row(row: &Row) -> Result<BankTransaction, rusqlite::Error> {
    let id = row.get(0)?;
    let member_id = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let created_on = row.get(4)?;
    let start_date = row.get(5)?;
    let interval = row.get(6)?;

    Ok(BankTransaction {
        id,
        member_id,
        amount,
        description,
        created_on,
        start_date,
        interval,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        database_id::MemberId,
        db::initialize,
        family::create_family,
        ledger::{
            BankTransaction, Interval, family_balances, member_transactions, record_transaction,
            record_recurring_transactions,
        },
        member::insert_member,
        money::Money,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_member(conn: &Connection) -> (i64, MemberId) {
        let family = create_family("Doe", None, conn).expect("Could not create family");
        let member = insert_member(family.id, "Alice", "child", None, conn)
            .expect("Could not create member");

        (family.id, member.id)
    }

    #[track_caller]
    fn assert_bank_matches_history(member_id: MemberId, conn: &Connection) {
        let (cached, total): (Money, Money) = conn
            .query_row(
                "SELECT m.chore_bank, COALESCE(SUM(t.amount), 0)
                 FROM member m
                 LEFT JOIN bank_transaction t ON t.member_id = m.id
                 WHERE m.id = ?1",
                [member_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        assert_eq!(
            cached, total,
            "cached chore bank {cached} does not match transaction history total {total}"
        );
    }

    fn count_transactions(conn: &Connection) -> u32 {
        conn.query_row("SELECT COUNT(id) FROM bank_transaction", [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn recording_credits_and_debits_yields_the_running_balance() {
        let conn = get_test_connection();
        let (family_id, member_id) = create_test_member(&conn);
        let day = date!(2024 - 05 - 01);

        record_transaction(
            BankTransaction::build(member_id, Money::from_cents(500), "chores").created_on(day),
            &conn,
        )
        .expect("Could not record credit");
        record_transaction(
            BankTransaction::build(member_id, Money::from_cents(-250), "snack").created_on(day),
            &conn,
        )
        .expect("Could not record debit");

        let balances = family_balances(family_id, &conn).unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].member_id, member_id);
        assert_eq!(balances[0].balance, Money::from_cents(250));

        // Newest first, same-day entries in reverse insertion order.
        let history = member_transactions(member_id, &conn).unwrap();
        let summary: Vec<(i64, &str)> = history
            .iter()
            .map(|entry| (entry.amount.cents(), entry.description.as_str()))
            .collect();
        assert_eq!(summary, vec![(-250, "snack"), (500, "chores")]);

        assert_bank_matches_history(member_id, &conn);
    }

    #[test]
    fn recording_for_an_unknown_member_writes_nothing() {
        let conn = get_test_connection();

        let result = record_transaction(
            BankTransaction::build(42, Money::from_cents(500), "chores"),
            &conn,
        );

        assert_eq!(result, Err(Error::MemberNotFound(42)));
        assert_eq!(count_transactions(&conn), 0);
    }

    #[test]
    fn balances_fail_for_an_unknown_family() {
        let conn = get_test_connection();

        let result = family_balances(1337, &conn);

        assert_eq!(result, Err(Error::FamilyNotFound(1337)));
    }

    #[test]
    fn balances_are_empty_for_a_family_with_no_members() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();

        let balances = family_balances(family.id, &conn).unwrap();

        assert_eq!(balances, vec![]);
    }

    #[test]
    fn balances_list_members_in_member_order() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();
        let alice = insert_member(family.id, "Alice", "child", None, &conn).unwrap();
        let bob = insert_member(family.id, "Bob", "child", None, &conn).unwrap();

        record_transaction(
            BankTransaction::build(bob.id, Money::from_cents(100), "chores"),
            &conn,
        )
        .unwrap();

        let balances = family_balances(family.id, &conn).unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(
            (balances[0].member_id, balances[0].balance),
            (alice.id, Money::ZERO)
        );
        assert_eq!(
            (balances[1].member_id, balances[1].balance),
            (bob.id, Money::from_cents(100))
        );
    }

    #[test]
    fn balances_are_recomputed_from_history_when_the_cache_drifts() {
        let conn = get_test_connection();
        let (family_id, member_id) = create_test_member(&conn);
        record_transaction(
            BankTransaction::build(member_id, Money::from_cents(500), "chores"),
            &conn,
        )
        .unwrap();

        // Simulate a write that skipped the ledger.
        conn.execute("UPDATE member SET chore_bank = 9999 WHERE id = ?1", [member_id])
            .unwrap();

        let balances = family_balances(family_id, &conn).unwrap();

        assert_eq!(balances[0].balance, Money::from_cents(500));
    }

    #[test]
    fn listing_transactions_fails_for_an_unknown_member() {
        let conn = get_test_connection();

        let result = member_transactions(42, &conn);

        assert_eq!(result, Err(Error::MemberNotFound(42)));
    }

    #[test]
    fn weekly_expansion_generates_one_entry_per_week() {
        let conn = get_test_connection();
        let (_, member_id) = create_test_member(&conn);

        let entries = record_recurring_transactions(
            member_id,
            Money::from_cents(100),
            "allowance",
            date!(2024 - 01 - 01),
            Interval::Weekly,
            date!(2024 - 01 - 22),
            &conn,
        )
        .expect("Could not record recurring transaction");

        let dates: Vec<_> = entries.iter().map(|entry| entry.created_on).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 08),
                date!(2024 - 01 - 15),
                date!(2024 - 01 - 22),
            ]
        );

        for entry in &entries {
            assert_eq!(entry.amount, Money::from_cents(100));
            assert_eq!(entry.description, "allowance");
            assert_eq!(entry.start_date, Some(date!(2024 - 01 - 01)));
            assert_eq!(entry.interval, Interval::Weekly);
        }

        let bank: Money = conn
            .query_row(
                "SELECT chore_bank FROM member WHERE id = ?1",
                [member_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(bank, Money::from_cents(400));

        assert_bank_matches_history(member_id, &conn);
    }

    #[test]
    fn monthly_expansion_clamps_to_the_end_of_short_months() {
        let conn = get_test_connection();
        let (_, member_id) = create_test_member(&conn);

        let entries = record_recurring_transactions(
            member_id,
            Money::from_cents(200),
            "pocket money",
            date!(2024 - 01 - 31),
            Interval::Monthly,
            date!(2024 - 04 - 01),
            &conn,
        )
        .unwrap();

        let dates: Vec<_> = entries.iter().map(|entry| entry.created_on).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 31),
                date!(2024 - 02 - 29),
                date!(2024 - 03 - 31),
            ]
        );

        assert_bank_matches_history(member_id, &conn);
    }

    #[test]
    fn expansion_starting_in_the_future_is_a_no_op() {
        let conn = get_test_connection();
        let (_, member_id) = create_test_member(&conn);

        let entries = record_recurring_transactions(
            member_id,
            Money::from_cents(100),
            "allowance",
            date!(2024 - 02 - 01),
            Interval::Daily,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        assert_eq!(entries, vec![]);
        assert_eq!(count_transactions(&conn), 0);
        assert_bank_matches_history(member_id, &conn);
    }

    #[test]
    fn expansion_rejects_a_one_time_interval_before_writing() {
        let conn = get_test_connection();
        let (_, member_id) = create_test_member(&conn);

        let result = record_recurring_transactions(
            member_id,
            Money::from_cents(100),
            "allowance",
            date!(2024 - 01 - 01),
            Interval::OneTime,
            date!(2024 - 01 - 22),
            &conn,
        );

        assert_eq!(
            result,
            Err(Error::UnsupportedInterval("one-time".to_owned()))
        );
        assert_eq!(count_transactions(&conn), 0);
    }

    #[test]
    fn expansion_for_an_unknown_member_writes_nothing() {
        let conn = get_test_connection();

        let result = record_recurring_transactions(
            42,
            Money::from_cents(100),
            "allowance",
            date!(2024 - 01 - 01),
            Interval::Weekly,
            date!(2024 - 01 - 22),
            &conn,
        );

        assert_eq!(result, Err(Error::MemberNotFound(42)));
        assert_eq!(count_transactions(&conn), 0);
    }
}
