//! Chorebank is a web app for managing a family's chores and allowances.
//!
//! This library provides a REST API that serves JSON to the family
//! dashboard: parents create chores and assign rewards, and every credit
//! or debit against a member's chore bank is recorded as a ledger
//! transaction.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod chore;
mod database_id;
mod db;
mod endpoints;
mod family;
mod ledger;
mod logging;
mod member;
mod money;
mod routing;
mod state;

pub use db::initialize as initialize_db;
pub use ledger::Interval;
pub use logging::logging_middleware;
pub use money::Money;
pub use routing::build_router;
pub use state::AppState;

use crate::database_id::{ChoreId, FamilyId, MemberId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a family name.
    #[error("family name cannot be empty")]
    EmptyFamilyName,

    /// An empty string was used for a member name.
    #[error("member name cannot be empty")]
    EmptyMemberName,

    /// An empty string was used for a chore name.
    #[error("chore name cannot be empty")]
    EmptyChoreName,

    /// A monetary amount could not be converted to whole cents.
    ///
    /// Amounts must be finite numbers within a sensible monetary range.
    /// They are validated before any write happens.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A recurrence interval string did not name a recognized interval.
    ///
    /// Recurring transactions accept `daily`, `weekly` and `monthly`.
    #[error("unsupported interval \"{0}\"")]
    UnsupportedInterval(String),

    /// A member was asked to pay their recurring expenses but has none set.
    #[error("no recurring expenses to deduct")]
    NoRecurringExpenses,

    /// A chore was marked completed without naming the completing member.
    #[error("a member ID is required to complete a chore")]
    MissingCompletingMember,

    /// The family ID does not refer to a family in the database.
    #[error("could not find a family with the ID {0}")]
    FamilyNotFound(FamilyId),

    /// The member ID does not refer to a member in the database.
    ///
    /// Also returned when a member exists but belongs to a different
    /// family than the one named in the request.
    #[error("could not find a member with the ID {0}")]
    MemberNotFound(MemberId),

    /// The chore ID does not refer to a chore in the database.
    #[error("could not find a chore with the ID {0}")]
    ChoreNotFound(ChoreId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// Multi-statement writes run inside a SQL transaction, so this error
    /// never leaves partial state behind.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that matches the error category.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyFamilyName
            | Error::EmptyMemberName
            | Error::EmptyChoreName
            | Error::InvalidAmount(_)
            | Error::UnsupportedInterval(_)
            | Error::NoRecurringExpenses
            | Error::MissingCompletingMember => StatusCode::BAD_REQUEST,
            Error::FamilyNotFound(_)
            | Error::MemberNotFound(_)
            | Error::ChoreNotFound(_)
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // The details of internal errors are not intended for clients.
        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            return (
                status_code,
                Json(json!({ "error": "internal server error" })),
            )
                .into_response();
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
