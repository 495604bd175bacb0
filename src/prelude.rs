pub use crate::builder::HistoryBuilder;
pub use crate::ds::GrowableRingBuffer;
pub use crate::error::{ConfigError, HistoryError};
pub use crate::history::MultiSeriesHistory;
pub use crate::traits::{DelayHistory, Timestamp};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::HistoryMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
