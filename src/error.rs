// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for the calendar engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures surfaced to the caller.
///
/// The engine is deterministic, so neither variant is worth retrying. Absence
/// of a birth hour is not an error; it only suppresses the hour pillar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A lunar year or Julian Day outside the 1900–2100 table coverage.
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: i64 },

    /// A value that can never be valid (month 13, non-existent leap month, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn out_of_range(what: &'static str, value: impl Into<i64>) -> Self {
        Error::OutOfRange {
            what,
            value: value.into(),
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// `true` for [`Error::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = Error::out_of_range("lunar year", 1899);
        assert_eq!(e.to_string(), "lunar year out of range: 1899");
        assert!(e.is_out_of_range());

        let e = Error::invalid("hour branch 12 not in 0..=11");
        assert_eq!(e.to_string(), "Invalid input: hour branch 12 not in 0..=11");
        assert!(!e.is_out_of_range());
    }
}
