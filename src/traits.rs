//! # History Traits
//!
//! Two seams: [`Timestamp`] abstracts the numeric time type used for sample
//! times, step sizes and retention horizons, and [`DelayHistory`] is the
//! operation set an integration routine needs from a delay history.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────┐
//!   │              Timestamp                    │
//!   │                                           │
//!   │  retention_cutoff(self, horizon) → Self   │
//!   │  is_valid_horizon(self) → bool            │
//!   └─────────────────────┬─────────────────────┘
//!                         │ time type of
//!                         ▼
//!   ┌───────────────────────────────────────────┐
//!   │          DelayHistory<V, T>               │
//!   │                                           │
//!   │  update(&mut, T, T, &[V]) → Result        │
//!   │  bisect(&, T) → usize                     │
//!   │  lookup(&, var, T) → Result<&V>           │
//!   │  num_variables(&) → usize                 │
//!   │  latest_time(&) → T                       │
//!   └───────────────────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Trait          | Implemented by                     | Purpose                       |
//! |----------------|------------------------------------|-------------------------------|
//! | `Timestamp`    | `f32`, `f64`, integer types        | Horizon arithmetic            |
//! | `DelayHistory` | [`MultiSeriesHistory`]             | Solver-facing history access  |
//!
//! [`MultiSeriesHistory`]: crate::history::MultiSeriesHistory
//!
//! ## Example: Generic Delay Term
//!
//! ```
//! use delaykit::history::MultiSeriesHistory;
//! use delaykit::traits::DelayHistory;
//!
//! // y(t - tau) for the first variable, falling back to the oldest sample
//! fn delayed<H: DelayHistory<f64, f64>>(history: &H, t: f64, tau: f64) -> f64 {
//!     match history.lookup(0, t - tau) {
//!         Ok(v) => *v,
//!         Err(_) => f64::NAN,
//!     }
//! }
//!
//! let mut history = MultiSeriesHistory::new(1, 0.0, 0.1, &[1.0], &[1.0]);
//! history.update(0.1, 0.1, &[0.9]).unwrap();
//! history.update(0.2, 0.1, &[0.8]).unwrap();
//!
//! assert_eq!(delayed(&history, 0.2, 0.1), 0.9);
//! ```

use std::fmt::Debug;

use crate::error::HistoryError;

/// Numeric type usable for sample times, step sizes and horizons.
///
/// `Default` must be the additive zero.
pub trait Timestamp: Copy + PartialOrd + Debug + Default {
    /// Returns `self - horizon`: the oldest time a sample may carry and still
    /// lie within `horizon` of `self`.
    ///
    /// Integer implementations saturate instead of overflowing.
    fn retention_cutoff(self, horizon: Self) -> Self;

    /// Returns `true` if `self` is usable as a retention horizon (`>= 0`).
    ///
    /// Always `false` for NaN.
    fn is_valid_horizon(self) -> bool {
        self >= Self::default()
    }
}

macro_rules! impl_float_timestamp {
    ($($ty:ty),*) => {
        $(
            impl Timestamp for $ty {
                #[inline]
                fn retention_cutoff(self, horizon: Self) -> Self {
                    self - horizon
                }
            }
        )*
    };
}

macro_rules! impl_int_timestamp {
    ($($ty:ty),*) => {
        $(
            impl Timestamp for $ty {
                #[inline]
                fn retention_cutoff(self, horizon: Self) -> Self {
                    self.saturating_sub(horizon)
                }
            }
        )*
    };
}

impl_float_timestamp!(f32, f64);
impl_int_timestamp!(i32, i64, u32, u64, usize);

/// Operations a delay-equation integrator needs from a sample history.
///
/// Integrators call [`update`](Self::update) once per accepted step and use
/// [`lookup`](Self::lookup) (or [`bisect`](Self::bisect) plus their own reads)
/// to evaluate delayed terms.
pub trait DelayHistory<V, T: Timestamp> {
    /// Records the state after an accepted step of size `step` ending at `time`.
    fn update(&mut self, time: T, step: T, values: &[V]) -> Result<(), HistoryError>;

    /// Returns the smallest shared index whose sample is the most recent one
    /// recorded at or before `target`.
    fn bisect(&self, target: T) -> usize;

    /// Returns `variable`'s sample at [`bisect(target)`](Self::bisect), or an
    /// error when that position has been evicted for the variable.
    fn lookup(&self, variable: usize, target: T) -> Result<&V, HistoryError>;

    /// Returns the number of tracked variables.
    fn num_variables(&self) -> usize;

    /// Returns the time of the newest recorded sample.
    fn latest_time(&self) -> T;
}
