//! # PMR — Penalty Amounts
//!
//! `Pmr` (pagamento in misura ridotta) is the monetary penalty attached to
//! a violation. It is stored as a whole number of euro cents so that no
//! floating point value ever reaches a comparison or the database.
//!
//! ## Input formats
//!
//! - [`Pmr::parse`] handles what a clerk types into the form: Italian
//!   formatting with `.` as thousands separator and `,` as decimal
//!   separator, optionally with a currency sign (`"€ 1.234,50"`). Every
//!   character that is not a digit or a comma is discarded first.
//! - The serde representation is the string `"1234.50"`. Deserialization
//!   additionally accepts Italian-formatted strings and plain JSON numbers
//!   of euros with at most two decimals.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PmrError;

/// A non-negative amount in euro cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pmr(u64);

impl Pmr {
    /// Zero euros.
    pub const ZERO: Pmr = Pmr(0);

    /// Build an amount from a cent count.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Build an amount from whole euros.
    pub fn from_euros(euros: u64) -> Result<Self, PmrError> {
        euros
            .checked_mul(100)
            .map(Self)
            .ok_or_else(|| PmrError::OutOfRange(euros.to_string()))
    }

    /// The amount in cents.
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Parse form input in Italian notation.
    ///
    /// `"150"` → 150,00; `"1.234,5"` → 1234,50; `"€ 80,00"` → 80,00.
    /// Digits past the second decimal place are dropped.
    pub fn parse(text: &str) -> Result<Self, PmrError> {
        let kept: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == ',')
            .collect();
        if !kept.chars().any(|c| c.is_ascii_digit()) {
            return Err(PmrError::NoDigits(text.to_string()));
        }

        let (whole, fraction) = match kept.split_once(',') {
            Some((whole, rest)) => (whole, rest.split(',').next().unwrap_or("")),
            None => (kept.as_str(), ""),
        };

        let euros: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| PmrError::OutOfRange(text.to_string()))?
        };
        let cents = fraction_cents(fraction);

        euros
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(|| PmrError::OutOfRange(text.to_string()))
    }

    /// Parse a dot-decimal amount as carried on the wire (`"150.00"`).
    ///
    /// Anything else that is not a plain `[-]digits[.digits]` string, such
    /// as `"150,00"` or `"€ 80"`, is read as form input by [`Pmr::parse`].
    pub fn parse_decimal(text: &str) -> Result<Self, PmrError> {
        let trimmed = text.trim();
        if trimmed
            .chars()
            .any(|c| !c.is_ascii_digit() && c != '.' && c != '-')
        {
            return Self::parse(trimmed);
        }
        if trimmed.starts_with('-') {
            return Err(PmrError::Negative(trimmed.to_string()));
        }
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(PmrError::NoDigits(text.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PmrError::Malformed(trimmed.to_string()));
        }
        if fraction.len() > 2 {
            return Err(PmrError::TooPrecise(trimmed.to_string()));
        }
        let euros: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| PmrError::OutOfRange(text.to_string()))?
        };
        euros
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents(fraction)))
            .map(Self)
            .ok_or_else(|| PmrError::OutOfRange(text.to_string()))
    }

    /// Amount from a JSON number of euros with at most two decimals.
    pub fn from_euro_f64(v: f64) -> Result<Self, PmrError> {
        if !v.is_finite() {
            return Err(PmrError::OutOfRange(v.to_string()));
        }
        if v < 0.0 {
            return Err(PmrError::Negative(v.to_string()));
        }
        let scaled = v * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(PmrError::TooPrecise(v.to_string()));
        }
        if rounded > u64::MAX as f64 {
            return Err(PmrError::OutOfRange(v.to_string()));
        }
        Ok(Self(rounded as u64))
    }

    /// Wire representation: `"1234.50"`.
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Cents encoded by the digits after the decimal separator.
fn fraction_cents(fraction: &str) -> u64 {
    let mut digits = fraction.chars().filter_map(|c| c.to_digit(10));
    let tenths = digits.next().unwrap_or(0) as u64;
    let hundredths = digits.next().unwrap_or(0) as u64;
    tenths * 10 + hundredths
}

/// Display in catalog notation: `1234,50`.
impl fmt::Display for Pmr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Pmr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Pmr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PmrVisitor)
    }
}

struct PmrVisitor;

impl<'de> Visitor<'de> for PmrVisitor {
    type Value = Pmr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative euro amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Pmr, E> {
        Pmr::parse_decimal(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Pmr, E> {
        Pmr::from_euros(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Pmr, E> {
        if v < 0 {
            return Err(E::custom(PmrError::Negative(v.to_string())));
        }
        Pmr::from_euros(v.unsigned_abs()).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Pmr, E> {
        Pmr::from_euro_f64(v).map_err(E::custom)
    }
}
