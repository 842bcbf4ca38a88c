//! # Error Types
//!
//! The pipeline itself never fails; these errors belong to the edges of
//! the core where user input becomes a typed value: draft validation,
//! PMR parsing, and parsing a color tag from its name.

use thiserror::Error;

/// A draft (create/edit payload) was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or whitespace.
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the field as it appears on the wire.
        field: &'static str,
    },

    /// A field exceeds its maximum length (in characters).
    #[error("{field} must not exceed {max} characters (got {actual})")]
    TooLong {
        /// Name of the field as it appears on the wire.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// The PMR amount could not be parsed.
    #[error("invalid pmr: {0}")]
    Pmr(#[from] PmrError),

    /// A color tag name is not one of the twelve known tags.
    #[error("unknown color tag: {0:?}")]
    UnknownColorTag(String),
}

impl ValidationError {
    /// The wire name of the offending field, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } | Self::TooLong { field, .. } => Some(field),
            Self::Pmr(_) => Some("pmr"),
            Self::UnknownColorTag(_) => None,
        }
    }
}

/// Error parsing a monetary amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PmrError {
    /// No digits left after discarding separators and symbols.
    #[error("amount contains no digits: {0:?}")]
    NoDigits(String),

    /// The amount does not fit in the cent counter.
    #[error("amount out of range: {0:?}")]
    OutOfRange(String),

    /// Negative amounts are not penalties.
    #[error("amount must not be negative: {0}")]
    Negative(String),

    /// A plain decimal amount with stray separators, e.g. `"1.2.3"`.
    #[error("malformed amount: {0:?}")]
    Malformed(String),

    /// More than two decimal places in a numeric amount.
    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(String),
}
