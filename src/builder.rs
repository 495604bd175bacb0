//! Builder for [`MultiSeriesHistory`] configurations.
//!
//! Collects variables one at a time so horizons and initial values cannot
//! drift out of step, then validates everything in one place.
//!
//! ## Example
//!
//! ```rust
//! use delaykit::builder::HistoryBuilder;
//!
//! let mut history = HistoryBuilder::new(0.0)
//!     .initial_step(0.01)
//!     .variable(1.0, 0.5)   // x(t - 1.0)
//!     .variable(2.5, 0.0)   // y(t - 2.5)
//!     .reserve(512)
//!     .build();
//!
//! history.update(0.01, 0.01, &[0.51, 0.01]).unwrap();
//! assert_eq!(history.num_variables(), 2);
//! assert_eq!(history.horizon(1), Some(2.5));
//! ```

use crate::error::ConfigError;
use crate::history::MultiSeriesHistory;
use crate::traits::Timestamp;

/// Accumulates the parameters of a [`MultiSeriesHistory`].
#[derive(Debug, Clone)]
pub struct HistoryBuilder<V, T = f64> {
    start_time: T,
    initial_step: T,
    horizons: Vec<T>,
    initial_values: Vec<V>,
    depth: usize,
}

impl<V, T> HistoryBuilder<V, T>
where
    V: Clone + Default,
    T: Timestamp,
{
    /// Starts a configuration whose history begins at `start_time`.
    ///
    /// The initial step size defaults to `T::default()`.
    pub fn new(start_time: T) -> Self {
        Self {
            start_time,
            initial_step: T::default(),
            horizons: Vec::new(),
            initial_values: Vec::new(),
            depth: 0,
        }
    }

    /// Sets the step size recorded with the seed sample.
    pub fn initial_step(mut self, step: T) -> Self {
        self.initial_step = step;
        self
    }

    /// Adds a variable that retains samples for `horizon` time units.
    pub fn variable(mut self, horizon: T, initial: V) -> Self {
        self.horizons.push(horizon);
        self.initial_values.push(initial);
        self
    }

    /// Adds several `(horizon, initial)` variables.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::builder::HistoryBuilder;
    ///
    /// let history = HistoryBuilder::new(0.0)
    ///     .variables([(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
    ///     .build();
    /// assert_eq!(history.num_variables(), 3);
    /// ```
    pub fn variables(mut self, variables: impl IntoIterator<Item = (T, V)>) -> Self {
        for (horizon, initial) in variables {
            self.horizons.push(horizon);
            self.initial_values.push(initial);
        }
        self
    }

    /// Preallocates every buffer for `depth` samples.
    pub fn reserve(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Returns the number of variables declared so far.
    pub fn len(&self) -> usize {
        self.horizons.len()
    }

    /// Returns `true` if no variables have been declared.
    pub fn is_empty(&self) -> bool {
        self.horizons.is_empty()
    }

    /// Validates the configuration and builds the history.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::builder::HistoryBuilder;
    ///
    /// let err = HistoryBuilder::new(0.0).variable(-1.0, 0.0).try_build().unwrap_err();
    /// assert!(err.to_string().contains("variable 0"));
    /// ```
    pub fn try_build(self) -> Result<MultiSeriesHistory<V, T>, ConfigError> {
        MultiSeriesHistory::try_with_depth(
            self.horizons.len(),
            self.start_time,
            self.initial_step,
            &self.horizons,
            &self.initial_values,
            self.depth,
        )
    }

    /// Builds the history.
    ///
    /// # Panics
    ///
    /// Panics if a horizon is negative or NaN.
    pub fn build(self) -> MultiSeriesHistory<V, T> {
        match self.try_build() {
            Ok(history) => history,
            Err(err) => panic!("invalid history configuration: {err}"),
        }
    }
}
