//! Simulation clock - simulated time, time step, resolution and the priority gate

use std::sync::Arc;
use std::time::Duration;

use kairos_core::{KairosError, KairosResult, SimTime, TimeResolution, DEFAULT_RESOLUTION};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::WallClock;

/// Clock configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    /// Logical advance per tick, in seconds
    pub time_step: f64,
    /// Decimal places kept on every time value
    pub resolution: u32,
    /// Follow the wall clock instead of stepping
    pub realtime: bool,
    /// Simulated time at start
    pub start_time: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            time_step: 1.0,
            resolution: DEFAULT_RESOLUTION,
            realtime: false,
            start_time: 0.0,
        }
    }
}

impl ClockConfig {
    /// Logical clock advancing `time_step` per tick
    pub fn simulated(time_step: f64) -> Self {
        ClockConfig {
            time_step,
            ..Self::default()
        }
    }

    /// Wall-clock driven; `time_step` is the default event period
    pub fn realtime(time_step: f64) -> Self {
        ClockConfig {
            time_step,
            realtime: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> KairosResult<()> {
        let resolution = TimeResolution::new(self.resolution)
            .ok_or(KairosError::InvalidResolution(self.resolution))?;
        // A step finer than the resolution would round to zero and stall the clock
        if !self.time_step.is_finite() || resolution.round(self.time_step) <= 0.0 {
            return Err(KairosError::InvalidTimeStep(self.time_step));
        }
        if !self.start_time.is_finite() {
            return Err(KairosError::InvalidBound {
                which: "start_time",
                value: self.start_time,
            });
        }
        Ok(())
    }
}

/// Copy of the clock state handed to each event slot
#[derive(Clone, Copy, Debug)]
pub struct ClockView {
    pub now: SimTime,
    pub time_step: f64,
    pub resolution: TimeResolution,
    pub realtime: bool,
    pub current_priority: u32,
}

impl ClockView {
    #[inline]
    pub fn round(&self, t: f64) -> SimTime {
        SimTime(t).rounded(self.resolution)
    }
}

/// The simulation clock.
///
/// Written only by the scheduler driving the simulation; events only
/// ever read it through a [`ClockView`].
/// INVARIANT: `current_time` never moves backwards
#[derive(Debug)]
pub struct Clock {
    current_time: SimTime,
    time_step: f64,
    resolution: TimeResolution,
    realtime: bool,
    start_time: SimTime,
    /// Tier allowed to act right now
    current_priority: u32,
    /// Highest tier registered by a live event
    max_priority: u32,
    tick_count: u64,
    /// Present once anchored in real-time mode
    wall: Option<WallClock>,
}

impl Clock {
    /// Logical clock with default configuration
    pub fn new() -> Self {
        Self::from_parts(&ClockConfig::default(), TimeResolution::default())
    }

    pub fn with_config(config: ClockConfig) -> KairosResult<Self> {
        config.validate()?;
        let resolution = TimeResolution::new(config.resolution)
            .ok_or(KairosError::InvalidResolution(config.resolution))?;
        Ok(Self::from_parts(&config, resolution))
    }

    fn from_parts(config: &ClockConfig, resolution: TimeResolution) -> Self {
        let start = SimTime(resolution.round(config.start_time));
        Clock {
            current_time: start,
            time_step: resolution.round(config.time_step),
            resolution,
            realtime: config.realtime,
            start_time: start,
            current_priority: 0,
            max_priority: 0,
            tick_count: 0,
            wall: None,
        }
    }

    /// Anchor the wall clock. Real-time mode measures from here.
    pub fn anchor(&mut self) {
        self.wall = Some(WallClock::new());
    }

    /// Start a tick: sync to the wall clock in real-time mode and
    /// re-open the gate at the lowest tier
    pub fn begin_tick(&mut self) {
        if self.realtime {
            let wall = *self.wall.get_or_insert_with(WallClock::new);
            let synced = self.round(self.start_time.0 + wall.elapsed_secs());
            self.current_time = self.current_time.max(synced);
        }
        self.current_priority = 0;
    }

    /// Open the gate for tier `priority`
    pub fn enter_tier(&mut self, priority: u32) {
        debug_assert!(priority >= self.current_priority, "tiers run in ascending order");
        self.current_priority = priority;
    }

    /// Finish a tick; in logical mode time advances by one step
    pub fn end_tick(&mut self) {
        self.tick_count += 1;
        if !self.realtime {
            self.current_time = self.round(self.current_time.0 + self.time_step);
        }
    }

    /// Raise the priority ceiling to at least `priority`
    pub fn raise_ceiling(&mut self, priority: u32) {
        self.max_priority = self.max_priority.max(priority);
    }

    /// Set the ceiling after terminal events have been reaped
    pub fn set_ceiling(&mut self, priority: u32) {
        self.max_priority = priority;
        self.current_priority = self.current_priority.min(priority);
    }

    /// Round to the clock's resolution
    #[inline]
    pub fn round(&self, t: f64) -> SimTime {
        SimTime(t).rounded(self.resolution)
    }

    /// Back to the configured start time, wall anchor dropped
    pub fn reset(&mut self) {
        self.current_time = self.start_time;
        self.current_priority = 0;
        self.max_priority = 0;
        self.tick_count = 0;
        self.wall = None;
    }

    pub fn view(&self) -> ClockView {
        ClockView {
            now: self.current_time,
            time_step: self.time_step,
            resolution: self.resolution,
            realtime: self.realtime,
            current_priority: self.current_priority,
        }
    }

    pub fn now(&self) -> SimTime {
        self.current_time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn resolution(&self) -> TimeResolution {
        self.resolution
    }

    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    pub fn current_priority(&self) -> u32 {
        self.current_priority
    }

    pub fn max_priority(&self) -> u32 {
        self.max_priority
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Wall time since the anchor, if anchored
    pub fn wall_elapsed(&self) -> Option<Duration> {
        self.wall.map(|w| w.elapsed())
    }

    /// Wall time remaining until simulated time `t` is reached in
    /// real-time mode. `None` in logical mode, before anchoring, or when
    /// `t` is too far out to express as a `Duration`.
    pub fn wall_until(&self, t: SimTime) -> Option<Duration> {
        if !self.realtime || !t.is_finite() {
            return None;
        }
        let elapsed = self.wall_elapsed()?.as_secs_f64();
        let remaining = t.0 - self.start_time.0 - elapsed;
        Duration::try_from_secs_f64(remaining.max(0.0)).ok()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock shared between the driver and event handles
#[derive(Clone, Debug)]
pub struct SharedClock(Arc<RwLock<Clock>>);

impl SharedClock {
    pub fn new(clock: Clock) -> Self {
        SharedClock(Arc::new(RwLock::new(clock)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Clock> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Clock> {
        self.0.write()
    }

    pub fn now(&self) -> SimTime {
        self.0.read().now()
    }

    pub fn view(&self) -> ClockView {
        self.0.read().view()
    }
}
