//! Defines the endpoint for materializing a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::MemberId,
    ledger::{
        BankTransaction, Interval,
        core::{record_recurring_transactions, today_utc},
    },
    money::Money,
};

/// The state needed to record a recurring transaction.
#[derive(Debug, Clone)]
pub struct RecordRecurringState {
    /// The database connection for writing to the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for materializing a recurring transaction.
#[derive(Debug, Deserialize)]
pub struct RecordRecurringForm {
    /// The signed amount of each generated entry, in dollars.
    pub amount: f64,
    /// Text detailing the transaction series.
    pub description: String,
    /// The first date of the series.
    pub start_date: Date,
    /// How often the series repeats: "daily", "weekly" or "monthly".
    pub interval: String,
}

/// A route handler for materializing a recurring transaction as one
/// backdated entry per occurrence from the start date through today.
///
/// All generated entries and a single balance adjustment are written as
/// one unit. A start date in the future yields an empty list.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn record_recurring_endpoint(
    State(state): State<RecordRecurringState>,
    Path(member_id): Path<MemberId>,
    Json(form): Json<RecordRecurringForm>,
) -> Result<(StatusCode, Json<Vec<BankTransaction>>), Error> {
    let amount = Money::from_dollars(form.amount)?;
    let interval: Interval = form.interval.parse()?;

    let connection = state.db_connection.lock().unwrap();

    let entries = record_recurring_transactions(
        member_id,
        amount,
        &form.description,
        form.start_date,
        interval,
        today_utc(),
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(entries)))
}
