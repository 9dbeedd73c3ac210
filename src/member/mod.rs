//! Member management for the chore tracker.
//!
//! This module contains the `Member` model, database functions for
//! managing a family's members, and the endpoints for the monthly
//! recurring expenses attached to a member.

pub(crate) mod core;
mod apply_recurring_expenses_endpoint;
mod set_recurring_expenses_endpoint;

pub use apply_recurring_expenses_endpoint::apply_recurring_expenses_endpoint;
pub use core::{
    DEFAULT_ROLE, Member, NewMember, create_member_table, delete_member, get_member,
    insert_member, list_family_members, require_member, set_recurring_expenses,
};
pub use set_recurring_expenses_endpoint::set_recurring_expenses_endpoint;
