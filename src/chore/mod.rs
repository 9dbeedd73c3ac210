//! Chore management for the chore tracker.
//!
//! This module contains everything related to chores:
//! - The `Chore` model and database functions for creating, editing and
//!   completing chores
//! - Endpoint handlers for the chore CRUD operations
//!
//! Completing a chore pays its reward into a member's chore bank through
//! the ledger, so completion credits appear in the transaction history
//! like every other earning.

pub(crate) mod core;
mod create_chore_endpoint;
mod delete_chore_endpoint;
mod list_chores_endpoint;
mod update_chore_endpoint;

pub use core::{Chore, ChoreUpdate, NewChore, create_chore_tables, list_family_chores};
pub use create_chore_endpoint::create_chore_endpoint;
pub use delete_chore_endpoint::delete_chore_endpoint;
pub use list_chores_endpoint::list_chores_endpoint;
pub use update_chore_endpoint::update_chore_endpoint;
