//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting*, and *export* so that history logic
//! only writes counters, tests and benches read snapshots, and monitoring
//! backends publish them.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │   HistoryMetricsRecorder     │    │ HistoryMetricsReadRecorder   │
//!   │   (&mut self: update path)   │    │ (&self: bisect / lookup)     │
//!   └──────────────┬───────────────┘    └──────────────┬───────────────┘
//!                  │                                   │
//!                  └─────────────────┬─────────────────┘
//!                                    ▼
//!                          ┌───────────────────┐
//!                          │  HistoryMetrics   │
//!                          └─────────┬─────────┘
//!                                    │ snapshot
//!          ┌─────────────────────────┴─────────────────────────┐
//!          ▼                                                   ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written on the `&mut self` update path.
pub trait HistoryMetricsRecorder {
    fn record_update_call(&mut self);
    fn record_update_rejected(&mut self);
    fn record_series_grow(&mut self);
    fn record_series_slide(&mut self);
    fn record_shared_grow(&mut self);
    fn record_shared_slide(&mut self);
    fn record_capacity_expansion(&mut self);
}

/// Counters written on `&self` query paths (interior mutability).
pub trait HistoryMetricsReadRecorder {
    fn record_bisect_call(&self);
    fn record_bisect_probe(&self);
    fn record_bisect_tie_step(&self);
    fn record_lookup_hit(&self);
    fn record_lookup_evicted(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
