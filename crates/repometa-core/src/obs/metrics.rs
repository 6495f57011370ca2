use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{LazyLock, Mutex, PoisonError},
};

///
/// EventState
/// Process-wide counters, in aggregate and per type path.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) types: BTreeMap<String, TypeCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Resolver
    pub resolutions: u64,
    pub resolution_failures: u64,

    // Descriptors
    pub descriptors_created: u64,

    // Customizers
    pub customizers_applied: u64,
    pub customizers_skipped: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TypeCounters {
    pub resolutions: u64,
    pub resolution_failures: u64,
    pub descriptors_created: u64,
    pub customizers_applied: u64,
    pub customizers_skipped: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub types: BTreeMap<String, TypeCounters>,
}

static EVENT_STATE: LazyLock<Mutex<EventState>> = LazyLock::new(Mutex::default);

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    let state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&state)
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut state)
}

/// Counters for one type path, created on first use.
pub(crate) fn type_entry<'a>(state: &'a mut EventState, path: &str) -> &'a mut TypeCounters {
    state.types.entry(path.to_string()).or_default()
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        types: m.types.clone(),
    })
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
