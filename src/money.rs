//! Exact monetary amounts for the chore bank ledger.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg},
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Error;

/// Amounts above ten trillion dollars are rejected as nonsense input.
const MAX_CENTS: f64 = 1e15;

/// A monetary amount stored as a whole number of cents.
///
/// Amounts enter and leave the API as decimal dollar values, but all
/// arithmetic and storage happens on integer cents so that summing a long
/// transaction history cannot drift by fractions of a cent. Positive
/// amounts are credits, negative amounts are debits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero dollars and zero cents.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// The amount as a whole number of cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal dollar value, e.g. `5.0` or `-2.5`, into cents.
    ///
    /// Values with more than two fraction digits are rounded to the
    /// nearest cent.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `dollars` is not a finite number
    /// or does not fit into a sensible monetary range.
    pub fn from_dollars(dollars: f64) -> Result<Self, Error> {
        if !dollars.is_finite() {
            return Err(Error::InvalidAmount(format!(
                "{dollars} is not a finite number"
            )));
        }

        let cents = (dollars * 100.0).round();

        if cents.abs() > MAX_CENTS {
            return Err(Error::InvalidAmount(format!("{dollars} is out of range")));
        }

        Ok(Money(cents as i64))
    }

    /// The amount as a decimal dollar value.
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The amount multiplied by a number of occurrences.
    pub const fn times(self, count: i64) -> Self {
        Money(self.0 * count)
    }

    /// Whether the amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;

        Money::from_dollars(dollars).map_err(de::Error::custom)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}
