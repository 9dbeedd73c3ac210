//! Defines the core data model and database queries for chores.
//!
//! Completing a chore pays its reward into the completing member's chore
//! bank through the ledger, inside the same SQL transaction that flips
//! the completion flag. The credit therefore shows up in the member's
//! transaction history like any other earning.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{ChoreId, FamilyId, MemberId},
    family::require_family,
    ledger::{
        BankTransaction, Interval,
        core::{apply_bank_delta, insert_transaction_row},
    },
    member::get_member,
    money::Money,
};

/// A task for family members with a reward paid into the chore bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chore {
    /// The ID of the chore.
    pub id: ChoreId,
    /// The family the chore belongs to.
    pub family_id: FamilyId,
    /// The display name of the chore.
    pub name: String,
    /// An optional longer description.
    pub description: Option<String>,
    /// When the chore is due.
    pub due_date: Date,
    /// How often the chore repeats.
    pub schedule: Interval,
    /// The amount credited to a member's chore bank on completion.
    pub reward: Money,
    /// Whether the chore has been completed.
    pub completed: bool,
    /// The members this chore is assigned to.
    pub assigned_member_ids: Vec<MemberId>,
}

/// The details needed to create a chore.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChore {
    /// The display name of the chore.
    pub name: String,
    /// An optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the chore is due.
    pub due_date: Date,
    /// How often the chore repeats.
    #[serde(default = "default_schedule")]
    pub schedule: Interval,
    /// The amount credited on completion.
    #[serde(default)]
    pub reward: Money,
    /// The members to assign the chore to.
    #[serde(default)]
    pub assigned_member_ids: Vec<MemberId>,
}

/// The replacement values for editing a chore.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoreUpdate {
    /// The display name of the chore.
    pub name: String,
    /// An optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the chore is due.
    pub due_date: Date,
    /// How often the chore repeats.
    #[serde(default = "default_schedule")]
    pub schedule: Interval,
    /// The amount credited on completion.
    #[serde(default)]
    pub reward: Money,
}

fn default_schedule() -> Interval {
    Interval::OneTime
}

/// Create the chore and chore assignment tables in the database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL
/// error.
pub fn create_chore_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS chore (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            family_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            due_date TEXT NOT NULL,
            schedule TEXT NOT NULL DEFAULT 'one-time',
            reward INTEGER NOT NULL DEFAULT 0,
            completed INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(family_id) REFERENCES family(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS chore_assignment (
            chore_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            PRIMARY KEY(chore_id, member_id),
            FOREIGN KEY(chore_id) REFERENCES chore(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(member_id) REFERENCES member(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Create a chore, with its assignments, as one unit.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyChoreName] if the chore name is empty or whitespace,
/// - or [Error::FamilyNotFound] if `family_id` does not refer to a family,
/// - or [Error::MemberNotFound] if an assignee does not belong to the
///   family, with nothing written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_chore(
    family_id: FamilyId,
    new_chore: &NewChore,
    connection: &Connection,
) -> Result<Chore, Error> {
    let name = new_chore.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyChoreName);
    }

    require_family(family_id, connection)?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    sql_transaction.execute(
        "INSERT INTO chore (family_id, name, description, due_date, schedule, reward)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            family_id,
            name,
            new_chore.description.as_deref(),
            new_chore.due_date,
            new_chore.schedule,
            new_chore.reward,
        ),
    )?;

    let chore_id = sql_transaction.last_insert_rowid();

    for &member_id in &new_chore.assigned_member_ids {
        assign_member(chore_id, family_id, member_id, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    get_chore(chore_id, connection)
}

/// Retrieve a chore by its `id`, with its assigned member IDs.
///
/// # Errors
/// This function will return a:
/// - [Error::ChoreNotFound] if `id` does not refer to a valid chore,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_chore(id: ChoreId, connection: &Connection) -> Result<Chore, Error> {
    let mut chore = connection
        .prepare(
            "SELECT id, family_id, name, description, due_date, schedule, reward, completed
             FROM chore WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_chore_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::ChoreNotFound(id),
            error => error.into(),
        })?;

    chore.assigned_member_ids = assigned_member_ids(id, connection)?;

    Ok(chore)
}

/// Retrieve the chores of a family, with their assigned member IDs.
///
/// # Errors
/// This function will return a:
/// - [Error::FamilyNotFound] if `family_id` does not refer to a family,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn list_family_chores(
    family_id: FamilyId,
    connection: &Connection,
) -> Result<Vec<Chore>, Error> {
    require_family(family_id, connection)?;

    let mut chores: Vec<Chore> = connection
        .prepare(
            "SELECT id, family_id, name, description, due_date, schedule, reward, completed
             FROM chore WHERE family_id = :family_id ORDER BY id",
        )?
        .query_map(&[(":family_id", &family_id)], map_chore_row)?
        .collect::<Result<_, _>>()?;

    for chore in &mut chores {
        chore.assigned_member_ids = assigned_member_ids(chore.id, connection)?;
    }

    Ok(chores)
}

/// Replace a chore's editable fields.
///
/// The completion flag is not touched here; see [complete_chore] and
/// [reopen_chore].
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyChoreName] if the new name is empty or whitespace,
/// - or [Error::ChoreNotFound] if `id` does not refer to a valid chore,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_chore(
    id: ChoreId,
    update: &ChoreUpdate,
    connection: &Connection,
) -> Result<Chore, Error> {
    let name = update.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyChoreName);
    }

    let rows_affected = connection.execute(
        "UPDATE chore SET name = ?1, description = ?2, due_date = ?3, schedule = ?4, reward = ?5
         WHERE id = ?6",
        (
            name,
            update.description.as_deref(),
            update.due_date,
            update.schedule,
            update.reward,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::ChoreNotFound(id));
    }

    get_chore(id, connection)
}

/// Mark a chore completed and pay its reward to `member_id`.
///
/// The completion flag, the ledger entry and the chore bank adjustment
/// are applied inside one SQL transaction. Completing a chore that is
/// already completed changes nothing and pays nothing.
///
/// # Errors
/// This function will return a:
/// - [Error::ChoreNotFound] if `chore_id` does not refer to a valid chore,
/// - or [Error::MemberNotFound] if `member_id` does not refer to a member
///   of the chore's family, with the chore left untouched,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn complete_chore(
    chore_id: ChoreId,
    member_id: MemberId,
    connection: &Connection,
) -> Result<Chore, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE chore SET completed = 1 WHERE id = ?1 AND completed = 0",
        [chore_id],
    )?;

    // Reports ChoreNotFound for a missing chore; an already-completed
    // chore is returned as-is without paying the reward again.
    let chore = get_chore(chore_id, &sql_transaction)?;

    if rows_affected > 0 {
        let member = get_member(member_id, &sql_transaction)?;

        if member.family_id != chore.family_id {
            return Err(Error::MemberNotFound(member_id));
        }

        if !chore.reward.is_zero() {
            apply_bank_delta(member_id, chore.reward, &sql_transaction)?;
            insert_transaction_row(
                BankTransaction::build(member_id, chore.reward, &chore.name),
                &sql_transaction,
            )?;
        }
    }

    sql_transaction.commit()?;

    Ok(chore)
}

/// Clear a chore's completion flag.
///
/// Reopening does not claw back a previously paid reward.
///
/// # Errors
/// Returns [Error::ChoreNotFound] if `id` does not refer to a chore.
pub fn reopen_chore(id: ChoreId, connection: &Connection) -> Result<Chore, Error> {
    let rows_affected = connection.execute("UPDATE chore SET completed = 0 WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::ChoreNotFound(id));
    }

    get_chore(id, connection)
}

/// Delete a chore and its assignments.
///
/// # Errors
/// Returns [Error::ChoreNotFound] if `id` does not refer to a chore.
pub fn delete_chore(id: ChoreId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM chore WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::ChoreNotFound(id));
    }

    Ok(())
}

/// Assign the chore to a member, checking the member belongs to the
/// chore's family.
fn assign_member(
    chore_id: ChoreId,
    family_id: FamilyId,
    member_id: MemberId,
    connection: &Connection,
) -> Result<(), Error> {
    let member = get_member(member_id, connection)?;

    if member.family_id != family_id {
        return Err(Error::MemberNotFound(member_id));
    }

    connection.execute(
        "INSERT OR IGNORE INTO chore_assignment (chore_id, member_id) VALUES (?1, ?2)",
        (chore_id, member_id),
    )?;

    Ok(())
}

fn assigned_member_ids(
    chore_id: ChoreId,
    connection: &Connection,
) -> Result<Vec<MemberId>, Error> {
    connection
        .prepare("SELECT member_id FROM chore_assignment WHERE chore_id = :chore_id ORDER BY member_id")?
        .query_map(&[(":chore_id", &chore_id)], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(|error| error.into()))
        .collect()
}

fn map_chore_row(row: &Row) -> Result<Chore, rusqlite::Error> {
    let id = row.get(0)?;
    let family_id = row.get(1)?;
    let name = row.get(2)?;
    let description = row.get(3)?;
    let due_date = row.get(4)?;
    let schedule = row.get(5)?;
    let reward = row.get(6)?;
    let completed = row.get(7)?;

    Ok(Chore {
        id,
        family_id,
        name,
        description,
        due_date,
        schedule,
        reward,
        completed,
        assigned_member_ids: Vec::new(),
    })
}
