use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::HistoryMetricsSnapshot;
use crate::metrics::traits::{HistoryMetricsReadRecorder, HistoryMetricsRecorder, MetricsReset};

#[derive(Debug, Default, Clone)]
pub struct HistoryMetrics {
    pub update_calls: u64,
    pub updates_rejected: u64,
    pub series_grows: u64,
    pub series_slides: u64,
    pub shared_grows: u64,
    pub shared_slides: u64,
    pub capacity_expansions: u64,
    pub bisect_calls: MetricsCell,
    pub bisect_probes: MetricsCell,
    pub bisect_tie_steps: MetricsCell,
    pub lookup_hits: MetricsCell,
    pub lookup_evicted: MetricsCell,
}

impl HistoryMetrics {
    /// Copies the counters into a snapshot; gauges are left for the caller.
    pub fn counters(&self) -> HistoryMetricsSnapshot {
        let lookup_hits = self.lookup_hits.get();
        let lookup_evicted = self.lookup_evicted.get();
        HistoryMetricsSnapshot {
            update_calls: self.update_calls,
            updates_rejected: self.updates_rejected,
            series_grows: self.series_grows,
            series_slides: self.series_slides,
            shared_grows: self.shared_grows,
            shared_slides: self.shared_slides,
            capacity_expansions: self.capacity_expansions,
            bisect_calls: self.bisect_calls.get(),
            bisect_probes: self.bisect_probes.get(),
            bisect_tie_steps: self.bisect_tie_steps.get(),
            lookup_calls: lookup_hits + lookup_evicted,
            lookup_hits,
            lookup_evicted,
            ..HistoryMetricsSnapshot::default()
        }
    }
}

impl HistoryMetricsRecorder for HistoryMetrics {
    fn record_update_call(&mut self) {
        self.update_calls += 1;
    }

    fn record_update_rejected(&mut self) {
        self.updates_rejected += 1;
    }

    fn record_series_grow(&mut self) {
        self.series_grows += 1;
    }

    fn record_series_slide(&mut self) {
        self.series_slides += 1;
    }

    fn record_shared_grow(&mut self) {
        self.shared_grows += 1;
    }

    fn record_shared_slide(&mut self) {
        self.shared_slides += 1;
    }

    fn record_capacity_expansion(&mut self) {
        self.capacity_expansions += 1;
    }
}

impl HistoryMetricsReadRecorder for &HistoryMetrics {
    fn record_bisect_call(&self) {
        self.bisect_calls.incr();
    }

    fn record_bisect_probe(&self) {
        self.bisect_probes.incr();
    }

    fn record_bisect_tie_step(&self) {
        self.bisect_tie_steps.incr();
    }

    fn record_lookup_hit(&self) {
        self.lookup_hits.incr();
    }

    fn record_lookup_evicted(&self) {
        self.lookup_evicted.incr();
    }
}

impl MetricsReset for HistoryMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}
