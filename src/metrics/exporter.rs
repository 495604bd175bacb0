use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::HistoryMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for history metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<HistoryMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &HistoryMetricsSnapshot) {
        self.write_counter("update_calls_total", snapshot.update_calls);
        self.write_counter("updates_rejected_total", snapshot.updates_rejected);
        self.write_counter("series_grows_total", snapshot.series_grows);
        self.write_counter("series_slides_total", snapshot.series_slides);
        self.write_counter("shared_grows_total", snapshot.shared_grows);
        self.write_counter("shared_slides_total", snapshot.shared_slides);
        self.write_counter("capacity_expansions_total", snapshot.capacity_expansions);
        self.write_counter("bisect_calls_total", snapshot.bisect_calls);
        self.write_counter("bisect_probes_total", snapshot.bisect_probes);
        self.write_counter("bisect_tie_steps_total", snapshot.bisect_tie_steps);
        self.write_counter("lookup_calls_total", snapshot.lookup_calls);
        self.write_counter("lookup_hits_total", snapshot.lookup_hits);
        self.write_counter("lookup_evicted_total", snapshot.lookup_evicted);
        self.write_gauge("variables", snapshot.variables as u64);
        self.write_gauge("shared_depth", snapshot.shared_depth as u64);
        self.write_gauge("shared_capacity", snapshot.shared_capacity as u64);
    }
}
