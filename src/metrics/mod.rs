//! Operational counters for [`MultiSeriesHistory`](crate::history::MultiSeriesHistory).
//!
//! Compiled only with the `metrics` feature.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
