//! Error types for time handling.

use thiserror::Error;

/// Errors from instant parsing and calendar conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Input string is not an RFC 3339 timestamp or `YYYY-MM-DD HH:MM[:SS]`.
    #[error("cannot parse '{input}' as a UTC instant: {reason}")]
    Parse { input: String, reason: String },
    /// Calendar fields do not name a real date or time of day.
    #[error("invalid calendar date: {0}")]
    InvalidCalendar(&'static str),
    /// Seconds value falls outside the representable calendar range.
    #[error("unix seconds {0} outside the supported calendar range")]
    OutOfRange(i64),
}
