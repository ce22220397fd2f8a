//! Simulation context
//!
//! A `Simulation` is the explicitly owned context of one run: the clock,
//! the scheduler holding every pending event, and the id generator.
//! Handles are cheap to clone, so actions can capture one to register
//! further events while the simulation is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kairos_core::{EventId, EventIdGen, KairosError, KairosResult, SimTime};
use kairos_time::{Clock, ClockConfig, ClockView, SharedClock};
use parking_lot::Mutex;
use tracing::info;

use crate::{Action, Event, EventBuilder, Scheduler, SchedulerStats, SimulationConfig, Trigger};

/// Default longest sleep between real-time ticks
pub const DEFAULT_MAX_IDLE: Duration = Duration::from_millis(10);

struct SimInner {
    clock: SharedClock,
    scheduler: Scheduler,
    ids: Mutex<EventIdGen>,
    running: AtomicBool,
    /// Held by whichever task is driving ticks
    driver: tokio::sync::Mutex<()>,
}

/// One simulation run
#[derive(Clone)]
pub struct Simulation {
    inner: Arc<SimInner>,
}

impl Simulation {
    /// Create a simulation with the given clock
    pub fn new(config: ClockConfig) -> KairosResult<Self> {
        Self::with_max_idle(config, DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(config: ClockConfig, max_idle: Duration) -> KairosResult<Self> {
        let clock = SharedClock::new(Clock::with_config(config)?);
        Ok(Simulation {
            inner: Arc::new(SimInner {
                scheduler: Scheduler::new(clock.clone(), max_idle),
                clock,
                ids: Mutex::new(EventIdGen::new()),
                running: AtomicBool::new(false),
                driver: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Create a simulation from a loaded configuration
    pub fn from_config(config: &SimulationConfig) -> KairosResult<Self> {
        config.validate()?;
        Self::with_max_idle(config.clock_config(), config.max_idle)
    }

    /// Start building an event. `at` and `till` accept a time in seconds
    /// or another event, whose end then serves as the condition.
    pub fn event(
        &self,
        at: impl Into<Trigger>,
        till: impl Into<Trigger>,
        action: Action,
    ) -> EventBuilder {
        EventBuilder::new(self.clone(), at.into(), till.into(), action)
    }

    /// Anchor the clock and mark the simulation as running
    pub fn init(&self) -> KairosResult<()> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(KairosError::SimulationAlreadyRunning);
        }
        let mut clock = self.inner.clock.write();
        clock.anchor();
        info!(
            now = %clock.now(),
            time_step = clock.time_step(),
            realtime = clock.is_realtime(),
            "simulation started"
        );
        Ok(())
    }

    /// Cancel every pending event, stop, and rewind the clock to its
    /// start time. Returns how many events were cancelled.
    pub fn teardown(&self) -> KairosResult<usize> {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return Err(KairosError::SimulationNotRunning);
        }
        let cancelled = self.inner.scheduler.clear();
        let mut clock = self.inner.clock.write();
        info!(
            cancelled,
            now = %clock.now(),
            wall = ?clock.wall_elapsed(),
            "simulation stopped"
        );
        clock.reset();
        Ok(cancelled)
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Run a single tick
    pub async fn tick(&self) -> KairosResult<()> {
        let _driver = self.drive()?;
        self.inner.scheduler.run_tick().await;
        Ok(())
    }

    /// Run `n` ticks
    pub async fn run_ticks(&self, n: u64) -> KairosResult<()> {
        let _driver = self.drive()?;
        for _ in 0..n {
            self.inner.scheduler.run_tick().await;
            self.inner.scheduler.idle().await;
        }
        Ok(())
    }

    /// Run until no event is pending. Does not return while an event with
    /// an unbounded end condition is alive.
    pub async fn run(&self) -> KairosResult<()> {
        let _driver = self.drive()?;
        while !self.inner.scheduler.is_idle() {
            self.inner.scheduler.run_tick().await;
            self.inner.scheduler.idle().await;
        }
        Ok(())
    }

    /// Run while simulated time is before `t`
    pub async fn run_until(&self, t: f64) -> KairosResult<()> {
        let _driver = self.drive()?;
        let until = SimTime(t);
        while self.now() < until {
            self.inner.scheduler.run_tick().await;
            self.inner.scheduler.idle().await;
        }
        Ok(())
    }

    /// Run for a wall-clock duration, or until no event is pending
    pub async fn run_for(&self, duration: Duration) -> KairosResult<()> {
        let _driver = self.drive()?;
        let deadline = tokio::time::Instant::now() + duration;
        while !self.inner.scheduler.is_idle() && tokio::time::Instant::now() < deadline {
            self.inner.scheduler.run_tick().await;
            self.inner.scheduler.idle().await;
        }
        Ok(())
    }

    /// Take the driver lock, initialising the simulation on first use
    fn drive(&self) -> KairosResult<tokio::sync::MutexGuard<'_, ()>> {
        let guard = self
            .inner
            .driver
            .try_lock()
            .map_err(|_| KairosError::DriverBusy)?;
        if !self.is_running() {
            self.init()?;
        }
        Ok(guard)
    }

    pub fn now(&self) -> SimTime {
        self.inner.clock.now()
    }

    /// Snapshot of the clock
    pub fn clock(&self) -> ClockView {
        self.inner.clock.view()
    }

    pub fn clock_handle(&self) -> SharedClock {
        self.inner.clock.clone()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// Pending events in tier order
    pub fn pending(&self) -> Vec<Event> {
        self.inner.scheduler.pending()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.scheduler.stats()
    }

    pub(crate) fn next_event_id(&self) -> EventId {
        self.inner.ids.lock().next_id()
    }

    pub(crate) fn register(&self, event: Event) {
        self.inner.scheduler.register(event);
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.now())
            .field("running", &self.is_running())
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}
