//! Observability: in-process counters and the sink abstraction.
//!
//! Resolution, descriptor, and customizer code never touches counters
//! directly; everything flows through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, TypeCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
