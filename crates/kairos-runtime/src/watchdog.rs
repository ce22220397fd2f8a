//! Deadline watchdogs

use std::sync::Arc;

use kairos_core::DeadlineViolation;

use crate::Event;

type WatchdogFn = Arc<dyn Fn(&Event, &DeadlineViolation) + Send + Sync>;

/// Remediation invoked whenever a real-time-strict event misses a deadline.
///
/// The event itself never recovers from a miss beyond what its watchdog
/// does; the default watchdog cancels it.
#[derive(Clone)]
pub struct Watchdog(WatchdogFn);

impl Watchdog {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Event, &DeadlineViolation) + Send + Sync + 'static,
    {
        Watchdog(Arc::new(f))
    }

    /// Cancel the offending event
    pub fn cancel() -> Self {
        Watchdog::new(|event, _| event.cancel())
    }

    /// Keep the event running; the violation is only logged by the event
    pub fn log_only() -> Self {
        Watchdog::new(|_, _| {})
    }

    pub fn fire(&self, event: &Event, violation: &DeadlineViolation) {
        (self.0)(event, violation)
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Watchdog::cancel()
    }
}

impl std::fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Watchdog")
    }
}
