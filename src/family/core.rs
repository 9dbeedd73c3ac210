//! Defines the core data model and database queries for families.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::Serialize;

use crate::{
    Error,
    database_id::FamilyId,
    member::{DEFAULT_ROLE, Member, NewMember, insert_member, list_family_members},
};

/// A household tracked by the application.
///
/// A family owns its members and chores; removing a family removes both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Family {
    /// The ID of the family.
    pub id: FamilyId,
    /// The display name of the family.
    pub name: String,
    /// An optional short code used to join the family from another device.
    pub short_code: Option<String>,
}

/// A family together with its member list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyWithMembers {
    /// The family itself.
    #[serde(flatten)]
    pub family: Family,
    /// The family's members in member order.
    pub members: Vec<Member>,
}

/// Create the family table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_family_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS family (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            short_code TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Create a family and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyFamilyName] if `name` is empty or whitespace,
/// - or [Error::SqlError] if there is an SQL error.
pub fn create_family(
    name: &str,
    short_code: Option<&str>,
    connection: &Connection,
) -> Result<Family, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyFamilyName);
    }

    connection.execute(
        "INSERT INTO family (name, short_code) VALUES (?1, ?2)",
        (name, short_code),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Family {
        id,
        name: name.to_owned(),
        short_code: short_code.map(str::to_owned),
    })
}

/// Create a family with an initial set of members as one unit.
///
/// Either the family and all of its members are created, or nothing is.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyFamilyName] if `name` is empty or whitespace,
/// - or [Error::EmptyMemberName] if any member name is empty,
/// - or [Error::SqlError] if there is an SQL error.
pub fn create_family_with_members(
    name: &str,
    short_code: Option<&str>,
    new_members: &[NewMember],
    connection: &Connection,
) -> Result<FamilyWithMembers, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let family = create_family(name, short_code, &sql_transaction)?;
    let mut members = Vec::with_capacity(new_members.len());

    for new_member in new_members {
        let role = new_member.role.as_deref().unwrap_or(DEFAULT_ROLE);

        members.push(insert_member(
            family.id,
            &new_member.name,
            role,
            new_member.phone.as_deref(),
            &sql_transaction,
        )?);
    }

    sql_transaction.commit()?;

    Ok(FamilyWithMembers { family, members })
}

/// Retrieve a family by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::FamilyNotFound] if `id` does not refer to a valid family,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_family(id: FamilyId, connection: &Connection) -> Result<Family, Error> {
    connection
        .prepare("SELECT id, name, short_code FROM family WHERE id = :id")?
        .query_row(&[(":id", &id)], map_family_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::FamilyNotFound(id),
            error => error.into(),
        })
}

/// Check that a family exists.
///
/// # Errors
/// Returns [Error::FamilyNotFound] if `id` does not refer to a family.
pub fn require_family(id: FamilyId, connection: &Connection) -> Result<(), Error> {
    get_family(id, connection).map(|_| ())
}

/// Retrieve a family together with its members.
///
/// # Errors
/// This function will return a:
/// - [Error::FamilyNotFound] if `id` does not refer to a valid family,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_family_with_members(
    id: FamilyId,
    connection: &Connection,
) -> Result<FamilyWithMembers, Error> {
    let family = get_family(id, connection)?;
    let members = list_family_members(id, connection)?;

    Ok(FamilyWithMembers { family, members })
}

fn map_family_row(row: &Row) -> Result<Family, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let short_code = row.get(2)?;

    Ok(Family {
        id,
        name,
        short_code,
    })
}
