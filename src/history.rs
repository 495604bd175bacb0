//! Multi-variable delay history with per-variable retention horizons.
//!
//! Keeps one [`GrowableRingBuffer`] per tracked variable plus two shared
//! buffers for sample times and step sizes. Every [`update`] advances all of
//! them by one position, so logical index `k` names the same update call in
//! every buffer that still retains position `k`. Each variable decides on its
//! own whether to keep its oldest sample (grow) or drop it (slide), based on
//! its fixed horizon.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                   MultiSeriesHistory<V, T> Layout                           │
//! │                                                                             │
//! │   horizons [1, 3], updates at t = 1, 2, 3, 4 (seed t0 = 0 twice)            │
//! │                                                                             │
//! │   shared index:   0     1     2     3     4                                 │
//! │                 ┌─────┬─────┬─────┬─────┬─────┐                             │
//! │   timestamps:   │  4  │  3  │  2  │  1  │  0  │   len = max depth = 5       │
//! │                 ├─────┼─────┼─────┼─────┴─────┘                             │
//! │   series 0:     │ y4  │ y3  │ y2  │               horizon 1, len 3          │
//! │                 ├─────┼─────┼─────┼─────┬─────┐                             │
//! │   series 1:     │ z4  │ z3  │ z2  │ z1  │ z0  │   horizon 3, len 5          │
//! │                 └─────┴─────┴─────┴─────┴─────┘                             │
//! │                                                                             │
//! │   Update Flow                                                               │
//! │   ───────────                                                               │
//! │                                                                             │
//! │   update(t, h, values):                                                     │
//! │     for each series i:                                                      │
//! │       oldest = timestamps[len_i - 1]                                        │
//! │       oldest < t - horizon_i  →  slide (drop oldest)                        │
//! │       otherwise               →  grow  (keep everything)                    │
//! │       write values[i] at index 0                                            │
//! │     shared buffers grow if the deepest series outgrew them, else slide      │
//! │                                                                             │
//! │   Lookup Flow                                                               │
//! │   ───────────                                                               │
//! │                                                                             │
//! │   bisect(target) → k      (timestamps non-increasing with index)            │
//! │   series(i).get(k)        (None when k >= len_i)                            │
//! │                                                                             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation        | Description                                   | Complexity      |
//! |------------------|-----------------------------------------------|-----------------|
//! | [`update`]       | Record one accepted step                      | O(N) amortized  |
//! | [`bisect`]       | Newest shared index at or before a time       | O(log depth)    |
//! | [`lookup`]       | `bisect` + checked read of one variable       | O(log depth)    |
//! | [`series`]       | Read-only view of one variable's buffer       | O(1)            |
//!
//! [`update`]: MultiSeriesHistory::update
//! [`bisect`]: MultiSeriesHistory::bisect
//! [`lookup`]: MultiSeriesHistory::lookup
//! [`series`]: MultiSeriesHistory::series
//!
//! ## Example Usage
//!
//! ```
//! use delaykit::history::MultiSeriesHistory;
//!
//! // x needs one time unit of history, y needs two
//! let mut history = MultiSeriesHistory::new(2, 0.0, 0.5, &[1.0, 2.0], &[1.0, 10.0]);
//!
//! for step in 1..=6 {
//!     let t = step as f64 * 0.5;
//!     history.update(t, 0.5, &[1.0 + t, 10.0 + t]).unwrap();
//! }
//!
//! // Newest sample at or before t = 3.0 - 0.75
//! let k = history.bisect(2.25);
//! assert_eq!(history.time_at(k), Some(2.0));
//! assert_eq!(history[0][k], 3.0);
//! assert_eq!(history[1][k], 12.0);
//!
//! // Too far back for x, still retained for y
//! assert!(history.lookup(0, 0.75).is_err());
//! assert_eq!(history.lookup(1, 0.75), Ok(&10.5));
//! ```
//!
//! ## Thread Safety
//!
//! `MultiSeriesHistory` is not thread-safe. It is meant to be owned by a
//! single integration loop.
//!
//! ## Implementation Notes
//!
//! - Construction seeds every buffer with two copies of the initial sample,
//!   so the first update needs no special case.
//! - Eviction is decided from the shared timestamp at the variable's deepest
//!   index, one sample at a time; with uniform steps a variable retains at
//!   most one sample older than its horizon.
//! - `update` validates its input before touching any buffer.
//! - `debug_validate_invariants()` available in debug/test builds

use std::cmp::Ordering;
use std::ops::Index;

use crate::ds::GrowableRingBuffer;
use crate::error::{ConfigError, HistoryError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::HistoryMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::HistoryMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    HistoryMetricsReadRecorder, HistoryMetricsRecorder, MetricsReset, MetricsSnapshotProvider,
};
use crate::traits::{DelayHistory, Timestamp};

/// Number of seed copies written at construction.
const SEED_DEPTH: usize = 2;

#[derive(Debug, Clone)]
struct Series<V, T> {
    horizon: T,
    samples: GrowableRingBuffer<V>,
}

/// Rolling history of `N` variables sharing one chronological index.
///
/// # Type Parameters
///
/// - `V`: sample value type, uniform across variables
/// - `T`: time type for timestamps, step sizes and horizons (default `f64`)
///
/// # Example
///
/// ```
/// use delaykit::history::MultiSeriesHistory;
///
/// let mut history = MultiSeriesHistory::new(1, 0.0, 1.0, &[2.0], &[0.0]);
/// for t in 1..=5 {
///     history.update(t as f64, 1.0, &[t as f64 * 10.0]).unwrap();
/// }
///
/// assert_eq!(history.latest_time(), 5.0);
/// assert_eq!(history.bisect(3.5), 2);
/// assert_eq!(history.sample(0, 2), Some(&30.0));
/// ```
#[derive(Debug, Clone)]
pub struct MultiSeriesHistory<V, T = f64> {
    series: Vec<Series<V, T>>,
    timestamps: GrowableRingBuffer<T>,
    steps: GrowableRingBuffer<T>,
    #[cfg(feature = "metrics")]
    metrics: HistoryMetrics,
}

impl<V, T> MultiSeriesHistory<V, T>
where
    V: Clone + Default,
    T: Timestamp,
{
    /// Creates a history of `n` variables starting at time `t0` with step `h0`.
    ///
    /// Uses the first `n` entries of `horizons` and `initial_values`.
    ///
    /// # Panics
    ///
    /// Panics if either slice has fewer than `n` entries or a horizon is
    /// negative or NaN. Use [`try_new`](Self::try_new) for caller-supplied
    /// parameters.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let history = MultiSeriesHistory::new(2, 0.0, 0.1, &[1.0, 3.0], &[5.0, 7.0]);
    /// assert_eq!(history.num_variables(), 2);
    /// assert_eq!(history.depth(), 2);
    /// assert_eq!(history.sample(1, 1), Some(&7.0));
    /// ```
    pub fn new(n: usize, t0: T, h0: T, horizons: &[T], initial_values: &[V]) -> Self {
        match Self::try_new(n, t0, h0, horizons, initial_values) {
            Ok(history) => history,
            Err(err) => panic!("invalid history configuration: {err}"),
        }
    }

    /// Fallible variant of [`new`](Self::new).
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let ok = MultiSeriesHistory::<f64>::try_new(1, 0.0, 0.1, &[1.0], &[0.0]);
    /// assert!(ok.is_ok());
    ///
    /// let short = MultiSeriesHistory::<f64>::try_new(2, 0.0, 0.1, &[1.0, 1.0], &[0.0]);
    /// assert!(short.unwrap_err().to_string().contains("initial_values"));
    /// ```
    pub fn try_new(
        n: usize,
        t0: T,
        h0: T,
        horizons: &[T],
        initial_values: &[V],
    ) -> Result<Self, ConfigError> {
        Self::try_with_depth(n, t0, h0, horizons, initial_values, 0)
    }

    /// Like [`try_new`](Self::try_new), preallocating every buffer for
    /// `depth` samples.
    pub fn try_with_depth(
        n: usize,
        t0: T,
        h0: T,
        horizons: &[T],
        initial_values: &[V],
        depth: usize,
    ) -> Result<Self, ConfigError> {
        if horizons.len() < n {
            return Err(ConfigError::new(format!(
                "horizons: expected at least {n} entries, got {}",
                horizons.len()
            )));
        }
        if initial_values.len() < n {
            return Err(ConfigError::new(format!(
                "initial_values: expected at least {n} entries, got {}",
                initial_values.len()
            )));
        }
        if let Some((variable, horizon)) = horizons[..n]
            .iter()
            .enumerate()
            .find(|(_, h)| !h.is_valid_horizon())
        {
            return Err(ConfigError::new(format!(
                "horizon for variable {variable} must be >= 0, got {horizon:?}"
            )));
        }

        let history = Self::seeded(t0, h0, &horizons[..n], &initial_values[..n], depth);
        tracing::debug!(variables = n, depth, "constructed multi-series history");
        Ok(history)
    }

    fn seeded(t0: T, h0: T, horizons: &[T], initial_values: &[V], depth: usize) -> Self {
        let depth = depth.max(SEED_DEPTH);
        let series = horizons
            .iter()
            .zip(initial_values)
            .map(|(&horizon, initial)| Series {
                horizon,
                samples: seed_ring(initial, depth),
            })
            .collect();
        Self {
            series,
            timestamps: seed_ring(&t0, depth),
            steps: seed_ring(&h0, depth),
            #[cfg(feature = "metrics")]
            metrics: HistoryMetrics::default(),
        }
    }

    /// Records one accepted step ending at `time` with step size `step`.
    ///
    /// For each variable `i`: if its oldest retained sample is older than
    /// `time - horizon_i`, that sample is dropped (slide); otherwise the
    /// buffer grows. `values[i]` becomes index 0 of variable `i`. The shared
    /// time and step buffers grow exactly when the deepest variable outgrows
    /// them, not whenever some variable grew: a shallow variable can grow in
    /// the same update in which the deepest one slides, and the shared
    /// buffers then slide so their depth stays equal to the deepest
    /// variable's. Extra entries in `values` are ignored.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::TooFewValues`] if `values` is shorter than
    ///   [`num_variables`](Self::num_variables).
    /// - [`HistoryError::NonMonotonicTime`] if `time` precedes
    ///   [`latest_time`](Self::latest_time) or is not comparable.
    ///
    /// The history is unchanged when an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::error::HistoryError;
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let mut history = MultiSeriesHistory::new(1, 0.0, 0.1, &[0.2], &[1.0]);
    /// history.update(0.1, 0.1, &[0.9]).unwrap();
    /// assert_eq!(history.latest_time(), 0.1);
    ///
    /// assert_eq!(history.update(0.05, 0.1, &[0.8]), Err(HistoryError::NonMonotonicTime));
    /// assert_eq!(history.latest_time(), 0.1);
    /// ```
    pub fn update(&mut self, time: T, step: T, values: &[V]) -> Result<(), HistoryError> {
        if let Err(err) = self.validate_update(time, values) {
            #[cfg(feature = "metrics")]
            self.metrics.record_update_rejected();
            tracing::debug!(error = %err, ?time, "rejected history update");
            return Err(err);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_update_call();

        let mut deepest = 0;
        for (series, value) in self.series.iter_mut().zip(values) {
            let oldest = self.timestamps[series.samples.len() - 1];
            if oldest < time.retention_cutoff(series.horizon) {
                series.samples.slide_in(value.clone());
                #[cfg(feature = "metrics")]
                self.metrics.record_series_slide();
            } else {
                #[cfg(feature = "metrics")]
                let capacity = series.samples.capacity();
                series.samples.append_at_head(value.clone());
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_series_grow();
                    if series.samples.capacity() != capacity {
                        self.metrics.record_capacity_expansion();
                    }
                }
            }
            deepest = deepest.max(series.samples.len());
        }

        if deepest > self.timestamps.len() {
            self.timestamps.append_at_head(time);
            self.steps.append_at_head(step);
            #[cfg(feature = "metrics")]
            self.metrics.record_shared_grow();
        } else {
            self.timestamps.slide_in(time);
            self.steps.slide_in(step);
            #[cfg(feature = "metrics")]
            self.metrics.record_shared_slide();
        }
        Ok(())
    }

    fn validate_update(&self, time: T, values: &[V]) -> Result<(), HistoryError> {
        if values.len() < self.series.len() {
            return Err(HistoryError::TooFewValues {
                expected: self.series.len(),
                got: values.len(),
            });
        }
        match time.partial_cmp(&self.latest_time()) {
            Some(Ordering::Less) | None => Err(HistoryError::NonMonotonicTime),
            Some(_) => Ok(()),
        }
    }
}

impl<V, T: Timestamp> MultiSeriesHistory<V, T> {
    /// Returns the smallest shared index whose sample is the most recent one
    /// recorded at or before `target`.
    ///
    /// Timestamps are non-increasing with index. Equal timestamps resolve to
    /// the lowest index carrying that value. A `target` at or after the
    /// newest time returns 0; a `target` before every retained time returns
    /// the deepest shared index (moved up past duplicates of its timestamp).
    ///
    /// The result is a shared index: it is only readable for variables whose
    /// [`retained_depth`](Self::retained_depth) exceeds it. Use
    /// [`lookup`](Self::lookup) for a checked read.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let mut history = MultiSeriesHistory::new(1, 0.0, 1.0, &[10.0], &[0.0]);
    /// for t in [1.0, 2.0, 2.0, 3.0] {
    ///     history.update(t, 1.0, &[t]).unwrap();
    /// }
    /// // timestamps: [3, 2, 2, 1, 0, 0]
    /// assert_eq!(history.bisect(5.0), 0);
    /// assert_eq!(history.bisect(2.0), 1);
    /// assert_eq!(history.bisect(2.5), 1);
    /// assert_eq!(history.bisect(1.5), 3);
    /// assert_eq!(history.bisect(-1.0), 4);
    /// ```
    pub fn bisect(&self, target: T) -> usize {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_bisect_call();

        let mut lo = 0;
        let mut hi = self.timestamps.len() - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            #[cfg(feature = "metrics")]
            (&self.metrics).record_bisect_probe();
            if self.timestamps[mid] <= target {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        while lo > 0 && self.timestamps[lo - 1] == self.timestamps[lo] {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_bisect_tie_step();
            lo -= 1;
        }
        lo
    }

    /// Returns `variable`'s sample at [`bisect(target)`](Self::bisect).
    ///
    /// # Errors
    ///
    /// - [`HistoryError::UnknownVariable`] if `variable` is out of range.
    /// - [`HistoryError::Evicted`] if the resolved index lies beyond the
    ///   variable's retained depth.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::error::HistoryError;
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let mut history = MultiSeriesHistory::new(2, 0.0, 1.0, &[1.0, 5.0], &[0.0, 0.0]);
    /// for t in 1..=5 {
    ///     let t = t as f64;
    ///     history.update(t, 1.0, &[t, -t]).unwrap();
    /// }
    ///
    /// assert_eq!(history.lookup(0, 4.5), Ok(&4.0));
    /// assert_eq!(history.lookup(1, 1.0), Ok(&-1.0));
    /// assert!(matches!(history.lookup(0, 1.0), Err(HistoryError::Evicted { .. })));
    /// assert!(matches!(history.lookup(2, 1.0), Err(HistoryError::UnknownVariable { .. })));
    /// ```
    pub fn lookup(&self, variable: usize, target: T) -> Result<&V, HistoryError> {
        let series = self
            .series
            .get(variable)
            .ok_or(HistoryError::UnknownVariable {
                variable,
                count: self.series.len(),
            })?;
        let index = self.bisect(target);
        match series.samples.get(index) {
            Some(value) => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_lookup_hit();
                Ok(value)
            },
            None => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_lookup_evicted();
                Err(HistoryError::Evicted {
                    index,
                    depth: series.samples.len(),
                })
            },
        }
    }

    /// Returns a read-only view of `variable`'s buffer.
    #[inline]
    pub fn series(&self, variable: usize) -> Option<&GrowableRingBuffer<V>> {
        self.series.get(variable).map(|s| &s.samples)
    }

    /// Returns `variable`'s sample at shared `index`, or `None` when either
    /// is out of range.
    #[inline]
    pub fn sample(&self, variable: usize, index: usize) -> Option<&V> {
        self.series(variable)?.get(index)
    }

    /// Iterates over `(horizon, buffer)` for every variable in order.
    pub fn iter_series(&self) -> impl Iterator<Item = (T, &GrowableRingBuffer<V>)> + '_ {
        self.series.iter().map(|s| (s.horizon, &s.samples))
    }

    /// Returns the shared timestamp buffer (index 0 = newest).
    #[inline]
    pub fn timestamps(&self) -> &GrowableRingBuffer<T> {
        &self.timestamps
    }

    /// Returns the shared step-size buffer (index 0 = newest).
    #[inline]
    pub fn steps(&self) -> &GrowableRingBuffer<T> {
        &self.steps
    }

    /// Returns the timestamp at shared `index`.
    #[inline]
    pub fn time_at(&self, index: usize) -> Option<T> {
        self.timestamps.get(index).copied()
    }

    /// Returns the step size at shared `index`.
    #[inline]
    pub fn step_at(&self, index: usize) -> Option<T> {
        self.steps.get(index).copied()
    }

    /// Returns the newest recorded time.
    #[inline]
    pub fn latest_time(&self) -> T {
        self.timestamps[0]
    }

    /// Returns the newest recorded step size.
    #[inline]
    pub fn latest_step(&self) -> T {
        self.steps[0]
    }

    /// Returns the number of shared positions (the deepest variable's depth).
    #[inline]
    pub fn depth(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns how many positions `variable` currently retains.
    #[inline]
    pub fn retained_depth(&self, variable: usize) -> Option<usize> {
        self.series(variable).map(GrowableRingBuffer::len)
    }

    /// Returns `variable`'s retention horizon.
    #[inline]
    pub fn horizon(&self, variable: usize) -> Option<T> {
        self.series.get(variable).map(|s| s.horizon)
    }

    /// Returns the number of tracked variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.series.len()
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.timestamps.approx_bytes()
            + self.steps.approx_bytes()
            + self
                .series
                .iter()
                .map(|s| s.samples.approx_bytes())
                .sum::<usize>()
    }

    /// Verifies the structural invariants linking the buffers.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::history::MultiSeriesHistory;
    ///
    /// let mut history = MultiSeriesHistory::new(2, 0.0, 1.0, &[1.0, 4.0], &[0, 0]);
    /// for t in 1..=10 {
    ///     history.update(t as f64, 1.0, &[t, t]).unwrap();
    /// }
    /// assert!(history.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let depth = self.timestamps.len();
        if self.steps.len() != depth {
            return Err(InvariantError::new(format!(
                "step depth {} differs from timestamp depth {depth}",
                self.steps.len()
            )));
        }
        if depth < SEED_DEPTH {
            return Err(InvariantError::new(format!(
                "shared depth {depth} below seed depth"
            )));
        }
        for (variable, series) in self.series.iter().enumerate() {
            let len = series.samples.len();
            if len < SEED_DEPTH || len > depth {
                return Err(InvariantError::new(format!(
                    "variable {variable} depth {len} outside [{SEED_DEPTH}, {depth}]"
                )));
            }
        }
        if let Some(deepest) = self.series.iter().map(|s| s.samples.len()).max() {
            if deepest != depth {
                return Err(InvariantError::new(format!(
                    "shared depth {depth} differs from deepest variable {deepest}"
                )));
            }
        }
        let ordered = self
            .timestamps
            .iter()
            .zip(self.timestamps.iter().skip(1))
            .all(|(newer, older)| older <= newer);
        if !ordered {
            return Err(InvariantError::new("timestamps are not non-increasing"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{}", err);
        }
        self.timestamps.debug_validate_invariants();
        self.steps.debug_validate_invariants();
        for series in &self.series {
            series.samples.debug_validate_invariants();
        }
    }
}

fn seed_ring<V: Clone + Default>(seed: &V, depth: usize) -> GrowableRingBuffer<V> {
    let mut ring = GrowableRingBuffer::with_capacity(depth);
    for _ in 0..SEED_DEPTH {
        ring.append_at_head(seed.clone());
    }
    ring
}

#[cfg(feature = "metrics")]
impl<V, T: Timestamp> MultiSeriesHistory<V, T> {
    /// Returns the counters recorded so far, with current gauges.
    pub fn metrics_snapshot(&self) -> HistoryMetricsSnapshot {
        HistoryMetricsSnapshot {
            variables: self.series.len(),
            shared_depth: self.timestamps.len(),
            shared_capacity: self.timestamps.capacity(),
            ..self.metrics.counters()
        }
    }
}

#[cfg(feature = "metrics")]
impl<V, T: Timestamp> MetricsSnapshotProvider<HistoryMetricsSnapshot> for MultiSeriesHistory<V, T> {
    fn snapshot(&self) -> HistoryMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<V, T> MetricsReset for MultiSeriesHistory<V, T> {
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

impl<V, T> Default for MultiSeriesHistory<V, T>
where
    V: Clone + Default,
    T: Timestamp,
{
    /// An empty history: zero variables, seeded at `T::default()`.
    fn default() -> Self {
        Self::seeded(T::default(), T::default(), &[], &[], 0)
    }
}

impl<V, T> Index<usize> for MultiSeriesHistory<V, T> {
    type Output = GrowableRingBuffer<V>;

    fn index(&self, variable: usize) -> &GrowableRingBuffer<V> {
        &self.series[variable].samples
    }
}

impl<V, T> DelayHistory<V, T> for MultiSeriesHistory<V, T>
where
    V: Clone + Default,
    T: Timestamp,
{
    fn update(&mut self, time: T, step: T, values: &[V]) -> Result<(), HistoryError> {
        MultiSeriesHistory::update(self, time, step, values)
    }

    fn bisect(&self, target: T) -> usize {
        MultiSeriesHistory::bisect(self, target)
    }

    fn lookup(&self, variable: usize, target: T) -> Result<&V, HistoryError> {
        MultiSeriesHistory::lookup(self, variable, target)
    }

    fn num_variables(&self) -> usize {
        MultiSeriesHistory::num_variables(self)
    }

    fn latest_time(&self) -> T {
        MultiSeriesHistory::latest_time(self)
    }
}
