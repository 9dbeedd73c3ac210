//! Family management for the chore tracker.
//!
//! This module contains everything related to families:
//! - The `Family` model and database functions for creating and querying
//!   families
//! - Endpoint handlers for creating families and managing their members

pub(crate) mod core;
mod add_member_endpoint;
mod create_family_endpoint;
mod get_family_endpoint;
mod remove_member_endpoint;

pub use add_member_endpoint::add_member_endpoint;
pub use core::{
    Family, FamilyWithMembers, create_family, create_family_with_members, create_family_table,
    get_family, get_family_with_members, require_family,
};
pub use create_family_endpoint::create_family_endpoint;
pub use get_family_endpoint::get_family_endpoint;
pub use remove_member_endpoint::remove_member_endpoint;
