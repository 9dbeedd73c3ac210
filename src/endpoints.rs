//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/families/{family_id}',
//! use [format_endpoint].

/// The route to create a family.
pub const FAMILIES: &str = "/api/families";
/// The route to access a single family with its members and chores.
pub const FAMILY: &str = "/api/families/{family_id}";
/// The route to add a member to a family.
pub const FAMILY_MEMBERS: &str = "/api/families/{family_id}/members";
/// The route to remove a member from a family.
pub const FAMILY_MEMBER: &str = "/api/families/{family_id}/members/{member_id}";
/// The route to read the chore bank balances of a family's members.
pub const FAMILY_BALANCES: &str = "/api/families/{family_id}/balances";
/// The route to create and list a family's chores.
pub const FAMILY_CHORES: &str = "/api/families/{family_id}/chores";
/// The route to update or delete a single chore.
pub const CHORE: &str = "/api/chores/{chore_id}";
/// The route to record and list a member's chore bank transactions.
pub const MEMBER_TRANSACTIONS: &str = "/api/members/{member_id}/transactions";
/// The route to materialize a recurring transaction for a member.
pub const MEMBER_RECURRING_TRANSACTIONS: &str = "/api/members/{member_id}/transactions/recurring";
/// The route to set and apply a member's monthly recurring expenses.
pub const MEMBER_RECURRING_EXPENSES: &str = "/api/members/{member_id}/recurring_expenses";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/families/{family_id}',
/// '{family_id}' is the parameter.
///
/// Paths with two parameters can be formatted by applying this function
/// twice, once per ID, left to right.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
