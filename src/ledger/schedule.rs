//! Recurrence intervals and occurrence date arithmetic.

use std::{fmt, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, util::days_in_year_month};

use crate::Error;

/// How often a transaction or chore repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interval {
    /// A single occurrence with no repetition.
    OneTime,
    /// Repeats every day.
    Daily,
    /// Repeats every seven days.
    Weekly,
    /// Repeats every calendar month.
    Monthly,
}

impl Interval {
    /// The interval as the string stored in the database and sent over the
    /// API, e.g. "one-time".
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::OneTime => "one-time",
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }

    /// Ensure the interval describes a repeating schedule.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedInterval] for [Interval::OneTime], which
    /// cannot be expanded into a series of occurrences.
    pub fn require_recurring(self) -> Result<Self, Error> {
        match self {
            Interval::OneTime => Err(Error::UnsupportedInterval(self.as_str().to_owned())),
            interval => Ok(interval),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "one-time" => Ok(Interval::OneTime),
            "daily" => Ok(Interval::Daily),
            "weekly" => Ok(Interval::Weekly),
            "monthly" => Ok(Interval::Monthly),
            other => Err(Error::UnsupportedInterval(other.to_owned())),
        }
    }
}

impl ToSql for Interval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Interval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|_| FromSqlError::Other(format!("unknown interval \"{text}\"").into()))
    }
}

/// The date of the `n`-th occurrence of a series starting at `start`.
///
/// Occurrences are always computed from the series start rather than by
/// stepping the previous occurrence, so a monthly series anchored on the
/// 31st lands on the last day of shorter months and returns to the 31st
/// afterwards: 2024-01-31, 2024-02-29, 2024-03-31, and so on.
pub fn nth_occurrence(start: Date, interval: Interval, n: u32) -> Date {
    match interval {
        Interval::OneTime => start,
        Interval::Daily => start + Duration::days(n as i64),
        Interval::Weekly => start + Duration::weeks(n as i64),
        Interval::Monthly => shift_months(start, n as i32),
    }
}

/// Every occurrence of the series from `start` through `last`, inclusive.
///
/// Empty when `start` is after `last`. A one-time series has a single
/// occurrence on its start date.
pub fn occurrences_through(start: Date, interval: Interval, last: Date) -> Vec<Date> {
    if start > last {
        return Vec::new();
    }

    if interval == Interval::OneTime {
        return vec![start];
    }

    let mut dates = Vec::new();

    for n in 0.. {
        let date = nth_occurrence(start, interval, n);

        if date > last {
            break;
        }

        dates.push(date);
    }

    dates
}

/// Add `months` calendar months to `date`, clamping the day to the length
/// of the target month.
fn shift_months(date: Date, months: i32) -> Date {
    let zero_based_month = date.year() * 12 + (u8::from(date.month()) as i32 - 1) + months;
    let year = zero_based_month.div_euclid(12);
    let month = Month::try_from((zero_based_month.rem_euclid(12) + 1) as u8)
        .expect("a value in 1..=12 is always a valid month");
    let day = date.day().min(days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day)
        .expect("a day clamped to the month length is always valid")
}
