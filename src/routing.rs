//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    chore::{
        create_chore_endpoint, delete_chore_endpoint, list_chores_endpoint, update_chore_endpoint,
    },
    endpoints,
    family::{
        add_member_endpoint, create_family_endpoint, get_family_endpoint, remove_member_endpoint,
    },
    ledger::{
        get_balances_endpoint, get_transactions_endpoint, record_recurring_endpoint,
        record_transaction_endpoint,
    },
    member::{apply_recurring_expenses_endpoint, set_recurring_expenses_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::FAMILIES, post(create_family_endpoint))
        .route(endpoints::FAMILY, get(get_family_endpoint))
        .route(endpoints::FAMILY_MEMBERS, post(add_member_endpoint))
        .route(endpoints::FAMILY_MEMBER, delete(remove_member_endpoint))
        .route(endpoints::FAMILY_BALANCES, get(get_balances_endpoint))
        .route(
            endpoints::FAMILY_CHORES,
            get(list_chores_endpoint).post(create_chore_endpoint),
        )
        .route(
            endpoints::CHORE,
            put(update_chore_endpoint).delete(delete_chore_endpoint),
        )
        .route(
            endpoints::MEMBER_TRANSACTIONS,
            get(get_transactions_endpoint).post(record_transaction_endpoint),
        )
        .route(
            endpoints::MEMBER_RECURRING_TRANSACTIONS,
            post(record_recurring_endpoint),
        )
        .route(
            endpoints::MEMBER_RECURRING_EXPENSES,
            put(set_recurring_expenses_endpoint).post(apply_recurring_expenses_endpoint),
        )
        .fallback(get_not_found)
        .with_state(state)
}

/// The fallback for requests that match no route.
async fn get_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}
