//! Metrics sink boundary.
//!
//! Core logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between core logic and the
//! process-wide metrics state.
use crate::{obs::metrics, types::TypeToken};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum MetricsEvent {
    CustomizerApplied {
        repository: TypeToken,
    },
    CustomizerSkipped {
        repository: TypeToken,
    },
    DescriptorCreated {
        repository: TypeToken,
    },
    Resolution {
        ty: TypeToken,
        resolved: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::CustomizerApplied { repository } => {
                metrics::with_state_mut(|m| {
                    m.ops.customizers_applied = m.ops.customizers_applied.saturating_add(1);
                    let entry = metrics::type_entry(m, repository.path());
                    entry.customizers_applied = entry.customizers_applied.saturating_add(1);
                });
            }

            MetricsEvent::CustomizerSkipped { repository } => {
                metrics::with_state_mut(|m| {
                    m.ops.customizers_skipped = m.ops.customizers_skipped.saturating_add(1);
                    let entry = metrics::type_entry(m, repository.path());
                    entry.customizers_skipped = entry.customizers_skipped.saturating_add(1);
                });
            }

            MetricsEvent::DescriptorCreated { repository } => {
                metrics::with_state_mut(|m| {
                    m.ops.descriptors_created = m.ops.descriptors_created.saturating_add(1);
                    let entry = metrics::type_entry(m, repository.path());
                    entry.descriptors_created = entry.descriptors_created.saturating_add(1);
                });
            }

            MetricsEvent::Resolution { ty, resolved } => {
                metrics::with_state_mut(|m| {
                    m.ops.resolutions = m.ops.resolutions.saturating_add(1);
                    if !resolved {
                        m.ops.resolution_failures = m.ops.resolution_failures.saturating_add(1);
                    }

                    let entry = metrics::type_entry(m, ty.path());
                    entry.resolutions = entry.resolutions.saturating_add(1);
                    if !resolved {
                        entry.resolution_failures = entry.resolution_failures.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // clone out of the slot so a sink may record re-entrantly
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current process-wide metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all process-wide metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary, thread-scoped metrics sink override.
///
/// The previous override is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
