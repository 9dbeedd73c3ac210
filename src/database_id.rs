//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a row in the family table.
pub type FamilyId = DatabaseId;

/// The ID of a row in the member table.
pub type MemberId = DatabaseId;

/// The ID of a row in the chore table.
pub type ChoreId = DatabaseId;

/// The ID of a row in the bank transaction table.
pub type TransactionId = DatabaseId;
