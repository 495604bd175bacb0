//! delaykit: rolling per-variable sample histories for delay differential
//! equation solvers.
//!
//! [`MultiSeriesHistory`] keeps every sample of each tracked variable that is
//! younger than that variable's own horizon, and [`bisect`] finds the newest
//! sample at or before any past time. Storage is a
//! [`GrowableRingBuffer`] per variable plus shared time and step buffers.
//!
//! [`bisect`]: MultiSeriesHistory::bisect

pub mod builder;
pub mod ds;
pub mod error;
pub mod history;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::builder::HistoryBuilder;
pub use crate::ds::GrowableRingBuffer;
pub use crate::error::{ConfigError, HistoryError, InvariantError};
pub use crate::history::MultiSeriesHistory;
