//! Monitor event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::MonitorEvent;

/// Trait for receiving monitor events.
///
/// Implementations translate events into platform-specific actions.
/// The tracker emits events through this trait after successful mutations.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no store writes)
/// - Implementations should queue events for async processing
/// - Failure to emit must not affect tracking operations (best-effort)
pub trait MonitorEventSink: Send + Sync {
    /// Emit a single monitor event.
    fn emit(&self, event: MonitorEvent);
}

/// No-op implementation for tests or contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl MonitorEventSink for NoOpEventSink {
    fn emit(&self, _event: MonitorEvent) {
        // Intentionally empty - events are discarded
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<MonitorEvent>>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl MonitorEventSink for MockEventSink {
    fn emit(&self, event: MonitorEvent) {
        self.events.lock().unwrap().push(event);
    }
}
