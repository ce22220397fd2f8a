//! Pre-built scenarios

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kairos_runtime::{ClockConfig, Event, KairosResult, Simulation, Watchdog};
use parking_lot::Mutex;

use crate::ActionRecorder;

/// Logical clock with a unit step
pub fn unit_clock() -> KairosResult<Simulation> {
    Simulation::new(ClockConfig::simulated(1.0))
}

/// One repeating event acting over `[0, 5)` on a unit clock
pub fn five_tick_window(rec: &ActionRecorder) -> KairosResult<(Simulation, Event)> {
    let sim = unit_clock()?;
    let ev = sim
        .event(0.0, 5.0, rec.action(&sim, "window"))
        .label("window")
        .schedule()?;
    Ok((sim, ev))
}

/// `a` runs until t=10; `b` starts once `a` has ended and runs five more ticks
pub fn dependency_chain(rec: &ActionRecorder) -> KairosResult<(Simulation, Event, Event)> {
    let sim = unit_clock()?;
    let a = sim
        .event(0.0, 10.0, rec.action(&sim, "a"))
        .label("a")
        .schedule()?;
    let b = sim
        .event(&a, 15.0, rec.action(&sim, "b"))
        .label("b")
        .schedule()?;
    Ok((sim, a, b))
}

/// Two events over the same window; the tier-1 event is registered first
pub fn priority_pair(rec: &ActionRecorder) -> KairosResult<(Simulation, Event, Event)> {
    let sim = unit_clock()?;
    let high = sim
        .event(0.0, 3.0, rec.action(&sim, "tier1"))
        .label("tier1")
        .priority(1)
        .schedule()?;
    let low = sim
        .event(0.0, 3.0, rec.action(&sim, "tier0"))
        .label("tier0")
        .schedule()?;
    Ok((sim, low, high))
}

/// Real-time scenario outcome handles
pub struct Overrun {
    pub sim: Simulation,
    pub event: Event,
    /// Number of watchdog invocations
    pub watchdog_calls: Arc<AtomicUsize>,
    /// Violation messages seen by the watchdog
    pub violations: Arc<Mutex<Vec<String>>>,
}

/// Real-time clock; a strict event whose blocking action takes `delay`
/// against a period of `step`. The watchdog counts calls, then cancels.
pub fn realtime_overrun(rec: &ActionRecorder, step: f64, delay: Duration) -> KairosResult<Overrun> {
    let sim = Simulation::new(ClockConfig::realtime(step))?;
    let watchdog_calls = Arc::new(AtomicUsize::new(0));
    let violations = Arc::new(Mutex::new(Vec::new()));

    let calls = Arc::clone(&watchdog_calls);
    let seen = Arc::clone(&violations);
    let event = sim
        .event(0.0, f64::INFINITY, rec.blocking_action(&sim, "slow", delay))
        .label("slow")
        .step(step)
        .watchdog(Watchdog::new(move |event, violation| {
            calls.fetch_add(1, Ordering::SeqCst);
            seen.lock().push(violation.to_string());
            event.cancel();
        }))
        .schedule()?;

    Ok(Overrun {
        sim,
        event,
        watchdog_calls,
        violations,
    })
}
