//! Error types for the delaykit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when history construction parameters are
//!   invalid (short horizon or initial-value lists, negative horizons).
//! - [`HistoryError`]: Returned by runtime operations: rejected updates and
//!   lookups that land outside a variable's retained window.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use delaykit::error::{ConfigError, HistoryError};
//! use delaykit::history::MultiSeriesHistory;
//!
//! // Fallible constructor for user-supplied parameters
//! let history: Result<MultiSeriesHistory<f64>, ConfigError> =
//!     MultiSeriesHistory::try_new(2, 0.0, 0.1, &[1.0, 2.0], &[0.0, 0.0]);
//! assert!(history.is_ok());
//!
//! // A negative horizon is caught without panicking
//! let bad = MultiSeriesHistory::<f64>::try_new(1, 0.0, 0.1, &[-1.0], &[0.0]);
//! assert!(bad.is_err());
//!
//! // Updates with too few values are rejected
//! let mut history = history.unwrap();
//! let err = history.update(0.1, 0.1, &[1.0]).unwrap_err();
//! assert_eq!(err, HistoryError::TooFewValues { expected: 2, got: 1 });
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal history invariants are violated.
///
/// Produced by
/// [`MultiSeriesHistory::check_invariants`](crate::history::MultiSeriesHistory::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when history construction parameters are invalid.
///
/// Produced by [`MultiSeriesHistory::try_new`](crate::history::MultiSeriesHistory::try_new)
/// and [`HistoryBuilder::try_build`](crate::builder::HistoryBuilder::try_build).
///
/// # Example
///
/// ```
/// use delaykit::history::MultiSeriesHistory;
///
/// let err = MultiSeriesHistory::<f64>::try_new(3, 0.0, 0.1, &[1.0], &[0.0; 3]).unwrap_err();
/// assert!(err.to_string().contains("horizons"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// HistoryError
// ---------------------------------------------------------------------------

/// Error returned by history updates and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// `update` received fewer values than there are tracked variables.
    TooFewValues { expected: usize, got: usize },
    /// `update` received a time earlier than the newest recorded time, or a
    /// time that does not compare (NaN).
    NonMonotonicTime,
    /// The variable number does not name a tracked variable.
    UnknownVariable { variable: usize, count: usize },
    /// The resolved shared index lies beyond the variable's retained depth.
    Evicted { index: usize, depth: usize },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewValues { expected, got } => {
                write!(f, "expected {expected} values per update, got {got}")
            },
            Self::NonMonotonicTime => {
                f.write_str("update time precedes the newest recorded time")
            },
            Self::UnknownVariable { variable, count } => {
                write!(f, "variable {variable} out of range for {count} tracked variables")
            },
            Self::Evicted { index, depth } => {
                write!(f, "index {index} evicted (retained depth {depth})")
            },
        }
    }
}

impl std::error::Error for HistoryError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("shared depth mismatch");
        assert_eq!(err.to_string(), "shared depth mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("horizon must be >= 0");
        assert_eq!(err.to_string(), "horizon must be >= 0");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.message(), "x");
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- HistoryError -----------------------------------------------------

    #[test]
    fn history_display_variants() {
        let err = HistoryError::TooFewValues { expected: 4, got: 2 };
        assert_eq!(err.to_string(), "expected 4 values per update, got 2");

        let err = HistoryError::Evicted { index: 7, depth: 3 };
        assert!(err.to_string().contains("index 7"));
        assert!(err.to_string().contains("depth 3"));

        let err = HistoryError::UnknownVariable { variable: 5, count: 2 };
        assert!(err.to_string().contains("variable 5"));

        assert!(HistoryError::NonMonotonicTime.to_string().contains("precedes"));
    }

    #[test]
    fn history_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<HistoryError>();
    }
}
