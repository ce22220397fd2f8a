//! Events - schedulable units with start/end conditions, an action,
//! a priority tier and optional real-time deadlines.
//!
//! An event is processed one slot at a time by the scheduler. In each
//! slot it checks its start condition, acts at most once if its next
//! firing time has come, then checks its end condition.

use std::sync::Arc;

use kairos_core::{
    DeadlineViolation, EventId, KairosError, KairosResult, Lifecycle, SimTime, ViolationKind,
};
use kairos_time::{ClockView, SharedClock};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::{Action, Simulation, Watchdog};

/// Start or end condition of an event
#[derive(Clone, Debug)]
pub enum Trigger {
    /// Absolute simulated time
    Time(SimTime),
    /// Once the referenced event has ended
    After(Event),
}

/// State of a trigger at a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Pending,
    Fired,
    /// Depends on an event that was cancelled; can never fire
    Unreachable,
}

impl Trigger {
    /// A time trigger that never fires
    pub fn never() -> Self {
        Trigger::Time(SimTime::INFINITY)
    }

    pub fn state(&self, now: SimTime) -> TriggerState {
        match self {
            Trigger::Time(t) if now >= *t => TriggerState::Fired,
            Trigger::Time(_) => TriggerState::Pending,
            Trigger::After(other) => {
                let lc = other.lifecycle();
                if lc.ended {
                    TriggerState::Fired
                } else if lc.cancelled {
                    TriggerState::Unreachable
                } else {
                    TriggerState::Pending
                }
            }
        }
    }

    /// Firing time, if this is a time trigger
    pub fn time(&self) -> Option<SimTime> {
        match self {
            Trigger::Time(t) => Some(*t),
            Trigger::After(_) => None,
        }
    }
}

impl From<f64> for Trigger {
    fn from(secs: f64) -> Self {
        Trigger::Time(SimTime(secs))
    }
}

impl From<SimTime> for Trigger {
    fn from(t: SimTime) -> Self {
        Trigger::Time(t)
    }
}

impl From<Event> for Trigger {
    fn from(event: Event) -> Self {
        Trigger::After(event)
    }
}

impl From<&Event> for Trigger {
    fn from(event: &Event) -> Self {
        Trigger::After(event.clone())
    }
}

/// What happened during one processing slot
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlotReport {
    pub started: bool,
    pub acted: bool,
    pub ended: bool,
    pub cancelled: bool,
    pub violation: Option<ViolationKind>,
    pub failed: bool,
}

/// Mutable part of an event
#[derive(Debug)]
struct EventState {
    lifecycle: Lifecycle,
    /// Simulated time of the next act
    next: SimTime,
    acts: u64,
    violations: u64,
}

struct EventInner {
    id: EventId,
    label: Option<String>,
    at: Trigger,
    till: Trigger,
    action: Action,
    /// `None` means best-effort
    step: Option<f64>,
    priority: u32,
    once: bool,
    watchdog: Watchdog,
    clock: SharedClock,
    state: Mutex<EventState>,
}

/// Handle to a registered event.
///
/// Cloning is cheap and every clone refers to the same event. The
/// construction parameters are immutable; only the lifecycle changes.
#[derive(Clone)]
pub struct Event {
    inner: Arc<EventInner>,
}

impl Event {
    pub fn id(&self) -> EventId {
        self.inner.id
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Label if set, otherwise the id
    pub fn name(&self) -> String {
        match &self.inner.label {
            Some(label) => label.clone(),
            None => self.inner.id.to_string(),
        }
    }

    pub fn priority(&self) -> u32 {
        self.inner.priority
    }

    pub fn step(&self) -> Option<f64> {
        self.inner.step
    }

    pub fn is_best_effort(&self) -> bool {
        self.inner.step.is_none()
    }

    pub fn is_once(&self) -> bool {
        self.inner.once
    }

    pub fn at(&self) -> &Trigger {
        &self.inner.at
    }

    pub fn till(&self) -> &Trigger {
        &self.inner.till
    }

    pub fn action(&self) -> &Action {
        &self.inner.action
    }

    /// Simulated time at which the event next acts
    pub fn next(&self) -> SimTime {
        self.inner.state.lock().next
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.state.lock().lifecycle
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle().started
    }

    pub fn has_acted(&self) -> bool {
        self.lifecycle().acted
    }

    pub fn is_ended(&self) -> bool {
        self.lifecycle().ended
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle().paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.lifecycle().cancelled
    }

    pub fn is_terminal(&self) -> bool {
        self.lifecycle().is_terminal()
    }

    /// Number of successful acts
    pub fn acts(&self) -> u64 {
        self.inner.state.lock().acts
    }

    /// Number of deadline violations
    pub fn violations(&self) -> u64 {
        self.inner.state.lock().violations
    }

    /// Check the lifecycle flags for impossible combinations
    pub fn validate(&self) -> KairosResult<()> {
        self.lifecycle().validate()?;
        Ok(())
    }

    /// Force the event to end
    pub fn end(&self) {
        let changed = {
            let mut state = self.inner.state.lock();
            !state.lifecycle.cancelled && state.lifecycle.end()
        };
        if changed {
            info!(event = %self.name(), "event ended by request");
        }
    }

    /// Cancel the event. Nothing of it runs afterwards, not even its end bookkeeping.
    pub fn cancel(&self) {
        let changed = {
            let mut state = self.inner.state.lock();
            !state.lifecycle.ended && state.lifecycle.cancel()
        };
        if changed {
            info!(event = %self.name(), "event cancelled");
        }
    }

    /// Suspend acting; start and end transitions still happen
    pub fn pause(&self) {
        let changed = {
            let mut state = self.inner.state.lock();
            !state.lifecycle.is_terminal() && state.lifecycle.pause()
        };
        if changed {
            info!(event = %self.name(), "event paused");
        }
    }

    /// Un-suspend. `next` is reset to the current time so missed
    /// intervals are not caught up.
    pub fn resume(&self) {
        let now = self.inner.clock.now();
        let changed = {
            let mut state = self.inner.state.lock();
            let changed = state.lifecycle.resume();
            if changed {
                state.next = now;
            }
            changed
        };
        if changed {
            info!(event = %self.name(), at = %now, "event resumed");
        }
    }

    /// Earliest simulated time at which this event needs a slot, if known
    pub(crate) fn wake_time(&self) -> Option<SimTime> {
        let state = self.inner.state.lock();
        let lc = state.lifecycle;
        if lc.is_terminal() {
            return None;
        }
        if !lc.started {
            return self.inner.at.time();
        }
        let end = self.inner.till.time();
        let act = lc.can_act().then_some(state.next);
        match (act, end) {
            (Some(a), Some(e)) => Some(if e < a { e } else { a }),
            (a, e) => a.or(e),
        }
    }

    /// Process one slot: start check, act check, end check.
    pub(crate) async fn advance(&self, view: &ClockView) -> SlotReport {
        let mut report = SlotReport::default();

        if view.current_priority != self.inner.priority || self.is_terminal() {
            return report;
        }
        let now = view.now;

        if !self.is_started() {
            match self.inner.at.state(now) {
                TriggerState::Pending => return report,
                TriggerState::Unreachable => {
                    warn!(event = %self.name(), "start dependency was cancelled, cancelling event");
                    self.cancel();
                    report.cancelled = true;
                    return report;
                }
                TriggerState::Fired => {
                    {
                        let mut state = self.inner.state.lock();
                        state.lifecycle.start();
                        state.next = now;
                    }
                    info!(event = %self.name(), at = %now, "event started");
                    report.started = true;
                }
            }
        }

        // A slot at or past the end condition never acts
        if self.end_due(now) {
            self.finish(now, &mut report);
            return report;
        }

        let (can_act, next) = {
            let state = self.inner.state.lock();
            (state.lifecycle.can_act(), state.next)
        };
        if can_act && next <= now {
            self.act(view, next, &mut report).await;
            if report.ended || self.is_terminal() {
                return report;
            }
        }

        if self.end_due(now) {
            self.finish(now, &mut report);
        }
        report
    }

    async fn act(&self, view: &ClockView, next: SimTime, report: &mut SlotReport) {
        let now = view.now;
        let waiting = now - next;
        // Deadlines only bind strict events on a real-time clock
        let strict = self.inner.step.filter(|_| view.realtime);

        if let Some(step) = strict {
            if waiting > step {
                self.violate(
                    DeadlineViolation::ExceedWaitingTime {
                        waited: waiting,
                        step,
                    },
                    report,
                );
                return;
            }
        }

        let elapsed = match self.inner.action.invoke(self.inner.id).await {
            Ok(elapsed) => elapsed.as_secs_f64(),
            Err(e) => {
                error!(event = %self.name(), error = %e, "event action failed");
                report.failed = true;
                return;
            }
        };

        if let Some(step) = strict {
            let violation = if elapsed > step {
                Some(DeadlineViolation::ExceedExecutionTime { elapsed, step })
            } else if waiting + elapsed > step {
                Some(DeadlineViolation::ExceedEventDuration {
                    total: waiting + elapsed,
                    step,
                })
            } else {
                None
            };
            if let Some(violation) = violation {
                self.violate(violation, report);
                return;
            }
        }

        let ended = {
            let mut state = self.inner.state.lock();
            if state.lifecycle.is_terminal() {
                return;
            }
            state.lifecycle.mark_acted();
            state.acts += 1;
            state.next = match (view.realtime, self.inner.step) {
                (true, None) => now,
                (true, Some(step)) => view.round(now.0 + step),
                (false, step) => {
                    let step = step.unwrap_or(view.time_step).max(view.time_step);
                    view.round(state.next.0 + step)
                }
            };
            self.inner.once && state.lifecycle.end()
        };
        report.acted = true;
        info!(event = %self.name(), at = %now, next = %self.next(), "event acted");

        if ended {
            report.ended = true;
            info!(event = %self.name(), at = %now, "event ended after single act");
        }
    }

    fn violate(&self, violation: DeadlineViolation, report: &mut SlotReport) {
        self.inner.state.lock().violations += 1;
        report.violation = Some(violation.kind());
        warn!(
            event = %self.name(),
            kind = ?violation.kind(),
            overrun = violation.overrun(),
            "deadline missed: {}",
            violation
        );
        self.inner.watchdog.fire(self, &violation);
        if self.is_cancelled() {
            report.cancelled = true;
        }
    }

    fn end_due(&self, now: SimTime) -> bool {
        self.inner.till.state(now) == TriggerState::Fired
    }

    fn finish(&self, now: SimTime, report: &mut SlotReport) {
        let ended = {
            let mut state = self.inner.state.lock();
            if state.lifecycle.cancelled {
                return;
            }
            state.lifecycle.end()
        };
        if ended {
            report.ended = true;
            info!(event = %self.name(), at = %now, "event ended");
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Event {}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Event")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("priority", &self.inner.priority)
            .field("step", &self.inner.step)
            .field("next", &state.next)
            .field("lifecycle", &state.lifecycle)
            .finish()
    }
}

/// Builder for an event; `schedule` validates and registers it.
pub struct EventBuilder {
    sim: Simulation,
    at: Trigger,
    till: Trigger,
    action: Action,
    step: Option<f64>,
    label: Option<String>,
    once: bool,
    priority: u32,
    watchdog: Watchdog,
}

impl EventBuilder {
    pub(crate) fn new(sim: Simulation, at: Trigger, till: Trigger, action: Action) -> Self {
        EventBuilder {
            sim,
            at,
            till,
            action,
            step: None,
            label: None,
            once: false,
            priority: 0,
            watchdog: Watchdog::default(),
        }
    }

    /// Per-event period; makes the event real-time-strict
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// End after the first successful act
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Lower values act first within a tick
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn watchdog(mut self, watchdog: Watchdog) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Validate and register the event with the simulation
    pub fn schedule(self) -> KairosResult<Event> {
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(KairosError::InvalidStep(step));
            }
        }
        if let Trigger::Time(t) = self.at {
            if !t.is_finite() {
                return Err(KairosError::InvalidBound {
                    which: "at",
                    value: t.0,
                });
            }
        }
        if let Trigger::Time(t) = self.till {
            if t.0.is_nan() {
                return Err(KairosError::InvalidBound {
                    which: "till",
                    value: t.0,
                });
            }
        }

        let clock = self.sim.clock_handle();
        let round = |trigger: Trigger| match trigger {
            Trigger::Time(t) => Trigger::Time(clock.read().round(t.0)),
            other => other,
        };
        let at = round(self.at);
        let till = round(self.till);
        let step = self.step.map(|s| clock.read().round(s).0);
        if let Some(s) = step {
            if s <= 0.0 {
                return Err(KairosError::InvalidStep(s));
            }
        }

        let event = Event {
            inner: Arc::new(EventInner {
                id: self.sim.next_event_id(),
                label: self.label,
                at,
                till,
                action: self.action,
                step,
                priority: self.priority,
                once: self.once,
                watchdog: self.watchdog,
                clock: clock.clone(),
                state: Mutex::new(EventState {
                    lifecycle: Lifecycle::new(),
                    next: SimTime::ZERO,
                    acts: 0,
                    violations: 0,
                }),
            }),
        };
        self.sim.register(event.clone());
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClockConfig;

    fn sim() -> Simulation {
        Simulation::new(ClockConfig::simulated(1.0)).unwrap()
    }

    #[test]
    fn test_trigger_states() {
        let sim = sim();
        let t = Trigger::from(2.0);
        assert_eq!(t.state(SimTime(1.0)), TriggerState::Pending);
        assert_eq!(t.state(SimTime(2.0)), TriggerState::Fired);
        assert_eq!(Trigger::never().state(SimTime(1e300)), TriggerState::Pending);

        let dep = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        let after = Trigger::from(&dep);
        assert_eq!(after.state(SimTime(5.0)), TriggerState::Pending);
        dep.cancel();
        assert_eq!(after.state(SimTime(5.0)), TriggerState::Unreachable);
        assert!(after.time().is_none());
    }

    #[test]
    fn test_builder_validation() {
        let sim = sim();
        assert!(matches!(
            sim.event(0.0, 1.0, Action::noop()).step(0.0).schedule(),
            Err(KairosError::InvalidStep(_))
        ));
        assert!(matches!(
            sim.event(f64::NAN, 1.0, Action::noop()).schedule(),
            Err(KairosError::InvalidBound { which: "at", .. })
        ));
        assert!(matches!(
            sim.event(0.0, f64::NAN, Action::noop()).schedule(),
            Err(KairosError::InvalidBound { which: "till", .. })
        ));
        // A step that rounds to zero at the clock's resolution is rejected too
        assert!(sim
            .event(0.0, 1.0, Action::noop())
            .step(1e-9)
            .schedule()
            .is_err());
        assert!(sim
            .event(0.0, f64::INFINITY, Action::noop())
            .schedule()
            .is_ok());
    }

    #[test]
    fn test_handle_accessors() {
        let sim = sim();
        let ev = sim
            .event(0.0, 3.0, Action::noop())
            .label("probe")
            .priority(2)
            .step(0.5)
            .once()
            .schedule()
            .unwrap();

        assert_eq!(ev.name(), "probe");
        assert_eq!(ev.label(), Some("probe"));
        assert_eq!(ev.priority(), 2);
        assert_eq!(ev.step(), Some(0.5));
        assert!(!ev.is_best_effort());
        assert!(ev.is_once());
        assert_eq!(ev.action().kind(), crate::ActionKind::Immediate);
        assert!(ev.validate().is_ok());

        let anon = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        assert_eq!(anon.name(), anon.id().to_string());
        assert!(anon.is_best_effort());
        assert_ne!(anon, ev);
        assert_eq!(anon, anon.clone());
    }

    #[test]
    fn test_end_and_cancel_are_exclusive_terminals() {
        let sim = sim();
        let a = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        a.cancel();
        a.end();
        assert!(a.is_cancelled());
        assert!(!a.is_ended());

        let b = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        b.end();
        b.cancel();
        assert!(b.is_ended());
        assert!(b.is_started());
        assert!(!b.is_cancelled());
        assert!(b.validate().is_ok());
    }

    #[test]
    fn test_pause_ignored_after_terminal() {
        let sim = sim();
        let a = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        a.end();
        a.pause();
        assert!(!a.is_paused());
    }

    #[tokio::test]
    async fn test_slot_outside_tier_does_nothing() {
        let sim = sim();
        let ev = sim
            .event(0.0, 5.0, Action::noop())
            .priority(1)
            .schedule()
            .unwrap();

        let view = sim.clock();
        assert_eq!(view.current_priority, 0);
        let report = ev.advance(&view).await;
        assert_eq!(report, SlotReport::default());
        assert!(!ev.is_started());
    }

    #[tokio::test]
    async fn test_slot_start_act_end() {
        let sim = sim();
        let ev = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();

        let mut view = sim.clock();
        let report = ev.advance(&view).await;
        assert!(report.started);
        assert!(report.acted);
        assert!(!report.ended);
        assert_eq!(ev.next(), SimTime(1.0));

        view.now = SimTime(1.0);
        let report = ev.advance(&view).await;
        assert!(!report.acted);
        assert!(report.ended);
        assert_eq!(ev.acts(), 1);
    }

    #[tokio::test]
    async fn test_wake_time() {
        let sim = sim();
        let ev = sim.event(2.0, 9.0, Action::noop()).schedule().unwrap();
        assert_eq!(ev.wake_time(), Some(SimTime(2.0)));

        let mut view = sim.clock();
        view.now = SimTime(2.0);
        ev.advance(&view).await;
        assert_eq!(ev.wake_time(), Some(SimTime(3.0)));

        ev.pause();
        assert_eq!(ev.wake_time(), Some(SimTime(9.0)));
        ev.cancel();
        assert_eq!(ev.wake_time(), None);
    }

    fn realtime_view(sim: &Simulation, now: f64) -> ClockView {
        ClockView {
            now: SimTime(now),
            realtime: true,
            ..sim.clock()
        }
    }

    fn counting_watchdog(kinds: &Arc<Mutex<Vec<ViolationKind>>>) -> Watchdog {
        let kinds = Arc::clone(kinds);
        Watchdog::new(move |_, v| kinds.lock().push(v.kind()))
    }

    #[tokio::test]
    async fn test_waiting_time_violation_skips_action() {
        let sim = sim();
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let ev = sim
            .event(0.0, f64::INFINITY, Action::noop())
            .step(0.01)
            .watchdog(counting_watchdog(&kinds))
            .schedule()
            .unwrap();

        let report = ev.advance(&realtime_view(&sim, 0.0)).await;
        assert!(report.acted);
        assert_eq!(ev.next(), SimTime(0.01));

        let report = ev.advance(&realtime_view(&sim, 0.5)).await;
        assert!(!report.acted);
        assert_eq!(report.violation, Some(ViolationKind::WaitingTime));
        assert_eq!(*kinds.lock(), vec![ViolationKind::WaitingTime]);
        // Recoverable: the event keeps running and `next` is untouched
        assert!(!ev.is_terminal());
        assert_eq!(ev.next(), SimTime(0.01));
        assert_eq!(ev.acts(), 1);
        assert_eq!(ev.violations(), 1);
    }

    #[tokio::test]
    async fn test_execution_time_violation_cancels_by_default() {
        let sim = sim();
        let ev = sim
            .event(
                0.0,
                f64::INFINITY,
                Action::deferred(|| std::thread::sleep(std::time::Duration::from_millis(50))),
            )
            .step(0.01)
            .schedule()
            .unwrap();

        let report = ev.advance(&realtime_view(&sim, 0.0)).await;
        assert_eq!(report.violation, Some(ViolationKind::ExecutionTime));
        assert!(report.cancelled);
        assert!(ev.is_cancelled());
        assert!(!ev.has_acted());
        assert_eq!(ev.acts(), 0);
    }

    #[tokio::test]
    async fn test_event_duration_violation() {
        let sim = sim();
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let ev = sim
            .event(
                0.0,
                f64::INFINITY,
                Action::deferred(|| std::thread::sleep(std::time::Duration::from_millis(60))),
            )
            .step(0.1)
            .watchdog(counting_watchdog(&kinds))
            .schedule()
            .unwrap();

        let report = ev.advance(&realtime_view(&sim, 0.0)).await;
        assert!(report.acted);
        assert_eq!(ev.next(), SimTime(0.1));

        // Waited 0.05 and ran ~0.06: each fits the step, the sum does not
        let report = ev.advance(&realtime_view(&sim, 0.15)).await;
        assert_eq!(report.violation, Some(ViolationKind::EventDuration));
        assert_eq!(*kinds.lock(), vec![ViolationKind::EventDuration]);
        assert_eq!(ev.acts(), 1);
    }

    #[tokio::test]
    async fn test_best_effort_never_violates() {
        let sim = sim();
        let ev = sim
            .event(
                0.0,
                f64::INFINITY,
                Action::deferred(|| std::thread::sleep(std::time::Duration::from_millis(20))),
            )
            .schedule()
            .unwrap();

        for now in [0.0, 5.0, 50.0] {
            let report = ev.advance(&realtime_view(&sim, now)).await;
            assert!(report.acted);
            assert!(report.violation.is_none());
            // Best-effort on a real-time clock fires again as soon as possible
            assert_eq!(ev.next(), SimTime(now));
        }
    }

    #[tokio::test]
    async fn test_strict_event_on_logical_clock_never_violates() {
        let sim = sim();
        let ev = sim
            .event(
                0.0,
                f64::INFINITY,
                Action::deferred(|| std::thread::sleep(std::time::Duration::from_millis(20))),
            )
            .step(0.001)
            .schedule()
            .unwrap();

        let mut view = sim.clock();
        for t in 0..3 {
            view.now = SimTime(t as f64 * 10.0);
            let report = ev.advance(&view).await;
            assert!(report.violation.is_none());
        }
        // Logical advance uses the larger of the clock step and the event step
        assert_eq!(ev.next(), SimTime(3.0));
        assert_eq!(ev.acts(), 3);
    }

    #[tokio::test]
    async fn test_failed_action_does_not_act() {
        let sim = sim();
        let ev = sim
            .event(0.0, f64::INFINITY, Action::immediate(|| panic!("broken")))
            .schedule()
            .unwrap();

        let report = ev.advance(&sim.clock()).await;
        assert!(report.failed);
        assert!(!report.acted);
        assert!(!ev.is_terminal());
        assert_eq!(ev.next(), SimTime::ZERO);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_acts_logged_at_info() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let sim = sim();
        let ev = sim
            .event(0.0, 5.0, Action::noop())
            .label("logged")
            .schedule()
            .unwrap();
        ev.advance(&sim.clock()).await;

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let acted = output
            .lines()
            .find(|line| line.contains("event acted"))
            .expect("act was not logged at info");
        assert!(acted.contains("INFO"));
        assert!(acted.contains("logged"));
    }
}

