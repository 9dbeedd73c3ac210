//! Defines the core data model and database queries for family members.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{FamilyId, MemberId},
    money::Money,
};

/// The role given to members added without an explicit one.
pub const DEFAULT_ROLE: &str = "member";

/// A person belonging to a family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    /// The ID of the member.
    pub id: MemberId,
    /// The family the member belongs to.
    pub family_id: FamilyId,
    /// The display name of the member.
    pub name: String,
    /// A free-form role such as "parent" or "child".
    pub role: String,
    /// An optional contact number.
    pub phone: Option<String>,
    /// The cached chore bank balance, kept in lock step with the member's
    /// transaction history by the ledger.
    pub chore_bank: Money,
    /// The monthly expense amount deducted when the member's recurring
    /// expenses are applied.
    pub recurring_expenses: Money,
}

/// The details needed to add a member to a family.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    /// The display name of the member.
    pub name: String,
    /// The member's role, [DEFAULT_ROLE] if not given.
    #[serde(default)]
    pub role: Option<String>,
    /// An optional contact number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Create the member table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS member (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            family_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            phone TEXT,
            chore_bank INTEGER NOT NULL DEFAULT 0,
            recurring_expenses INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(family_id) REFERENCES family(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Add a member to a family with an empty chore bank.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyMemberName] if `name` is empty or whitespace,
/// - or [Error::FamilyNotFound] if `family_id` does not refer to a family,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_member(
    family_id: FamilyId,
    name: &str,
    role: &str,
    phone: Option<&str>,
    connection: &Connection,
) -> Result<Member, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyMemberName);
    }

    connection
        .execute(
            "INSERT INTO member (family_id, name, role, phone) VALUES (?1, ?2, ?3, ?4)",
            (family_id, name, role, phone),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::FamilyNotFound(family_id),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Member {
        id,
        family_id,
        name: name.to_owned(),
        role: role.to_owned(),
        phone: phone.map(str::to_owned),
        chore_bank: Money::ZERO,
        recurring_expenses: Money::ZERO,
    })
}

/// Retrieve a member by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MemberNotFound] if `id` does not refer to a valid member,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_member(id: MemberId, connection: &Connection) -> Result<Member, Error> {
    connection
        .prepare(
            "SELECT id, family_id, name, role, phone, chore_bank, recurring_expenses
             FROM member WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_member_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MemberNotFound(id),
            error => error.into(),
        })
}

/// Check that a member exists.
///
/// # Errors
/// Returns [Error::MemberNotFound] if `id` does not refer to a member.
pub fn require_member(id: MemberId, connection: &Connection) -> Result<(), Error> {
    get_member(id, connection).map(|_| ())
}

/// Retrieve the members of a family in member order.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn list_family_members(
    family_id: FamilyId,
    connection: &Connection,
) -> Result<Vec<Member>, Error> {
    connection
        .prepare(
            "SELECT id, family_id, name, role, phone, chore_bank, recurring_expenses
             FROM member WHERE family_id = :family_id ORDER BY id",
        )?
        .query_map(&[(":family_id", &family_id)], map_member_row)?
        .map(|maybe_member| maybe_member.map_err(|error| error.into()))
        .collect()
}

/// Remove a member from a family, along with their transaction history.
///
/// # Errors
/// Returns [Error::MemberNotFound] if `member_id` does not refer to a
/// member of the family `family_id`.
pub fn delete_member(
    family_id: FamilyId,
    member_id: MemberId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM member WHERE id = ?1 AND family_id = ?2",
        (member_id, family_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::MemberNotFound(member_id));
    }

    Ok(())
}

/// Set the monthly recurring expense amount for a member.
///
/// # Errors
/// Returns [Error::MemberNotFound] if `member_id` does not refer to a
/// member.
pub fn set_recurring_expenses(
    member_id: MemberId,
    amount: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE member SET recurring_expenses = ?1 WHERE id = ?2",
        (amount, member_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::MemberNotFound(member_id));
    }

    Ok(())
}

fn map_member_row(row: &Row) -> Result<Member, rusqlite::Error> {
    let id = row.get(0)?;
    let family_id = row.get(1)?;
    let name = row.get(2)?;
    let role = row.get(3)?;
    let phone = row.get(4)?;
    let chore_bank = row.get(5)?;
    let recurring_expenses = row.get(6)?;

    Ok(Member {
        id,
        family_id,
        name,
        role,
        phone,
        chore_bank,
        recurring_expenses,
    })
}

#[cfg(test)]
mod member_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        family::create_family,
        member::{
            delete_member, get_member, insert_member, list_family_members, set_recurring_expenses,
        },
        money::Money,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_member_succeeds() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();

        let member = insert_member(family.id, "Alice", "child", Some("555-0199"), &conn).unwrap();

        assert!(member.id > 0);
        assert_eq!(member.chore_bank, Money::ZERO);
        assert_eq!(get_member(member.id, &conn).unwrap(), member);
    }

    #[test]
    fn insert_member_fails_on_empty_name() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();

        let result = insert_member(family.id, "  \t", "child", None, &conn);

        assert_eq!(result, Err(Error::EmptyMemberName));
    }

    #[test]
    fn insert_member_fails_on_unknown_family() {
        let conn = get_test_connection();

        let result = insert_member(42, "Alice", "child", None, &conn);

        assert_eq!(result, Err(Error::FamilyNotFound(42)));
    }

    #[test]
    fn list_family_members_preserves_member_order() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();
        let alice = insert_member(family.id, "Alice", "child", None, &conn).unwrap();
        let bob = insert_member(family.id, "Bob", "parent", None, &conn).unwrap();

        let members = list_family_members(family.id, &conn).unwrap();

        assert_eq!(members, vec![alice, bob]);
    }

    #[test]
    fn delete_member_removes_their_transactions() {
        let conn = get_test_connection();
        let family = create_family("Doe", None, &conn).unwrap();
        let member = insert_member(family.id, "Alice", "child", None, &conn).unwrap();
        conn.execute(
            "INSERT INTO bank_transaction (member_id, amount, description, created_on)
             VALUES (?1, 100, 'chores', '2024-01-01')",
            [member.id],
        )
        .unwrap();

        delete_member(family.id, member.id, &conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(id) FROM bank_transaction", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn delete_member_fails_for_a_member_of_another_family() {
        let conn = get_test_connection();
        let doe = create_family("Doe", None, &conn).unwrap();
        let roe = create_family("Roe", None, &conn).unwrap();
        let member = insert_member(doe.id, "Alice", "child", None, &conn).unwrap();

        let result = delete_member(roe.id, member.id, &conn);

        assert_eq!(result, Err(Error::MemberNotFound(member.id)));
    }

    #[test]
    fn set_recurring_expenses_fails_on_unknown_member() {
        let conn = get_test_connection();

        let result = set_recurring_expenses(42, Money::from_cents(100), &conn);

        assert_eq!(result, Err(Error::MemberNotFound(42)));
    }
}
