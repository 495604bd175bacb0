/// Point-in-time copy of a history's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryMetricsSnapshot {
    pub update_calls: u64,
    pub updates_rejected: u64,
    pub series_grows: u64,
    pub series_slides: u64,
    pub shared_grows: u64,
    pub shared_slides: u64,
    pub capacity_expansions: u64,

    pub bisect_calls: u64,
    pub bisect_probes: u64, // binary-search comparisons
    pub bisect_tie_steps: u64,

    pub lookup_calls: u64,
    pub lookup_hits: u64,
    pub lookup_evicted: u64,

    // gauges captured at snapshot time
    pub variables: usize,
    pub shared_depth: usize,
    pub shared_capacity: usize,
}
