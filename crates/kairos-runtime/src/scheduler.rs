//! Priority-tiered scheduler
//!
//! The scheduler owns every pending event, bucketed by priority tier.
//! One tick opens each non-empty tier in ascending order and gives each
//! of its events exactly one slot, so every tier-0 event has had its
//! turn before any tier-1 event runs. No event ever polls for its turn.

use std::collections::BTreeMap;
use std::time::Duration;

use kairos_core::{SimTime, ViolationKind};
use kairos_time::SharedClock;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{Event, SlotReport};

/// Running counters of the scheduler
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub slots: u64,
    pub starts: u64,
    pub acts: u64,
    pub ends: u64,
    pub cancellations: u64,
    pub waiting_violations: u64,
    pub execution_violations: u64,
    pub duration_violations: u64,
    pub action_failures: u64,
    pub reaped: u64,
    pub registered: u64,
}

impl SchedulerStats {
    pub fn violations(&self) -> u64 {
        self.waiting_violations + self.execution_violations + self.duration_violations
    }

    fn record(&mut self, slot: &SlotReport) {
        self.slots += 1;
        self.starts += slot.started as u64;
        self.acts += slot.acted as u64;
        self.ends += slot.ended as u64;
        self.cancellations += slot.cancelled as u64;
        self.action_failures += slot.failed as u64;
        match slot.violation {
            Some(ViolationKind::WaitingTime) => self.waiting_violations += 1,
            Some(ViolationKind::ExecutionTime) => self.execution_violations += 1,
            Some(ViolationKind::EventDuration) => self.duration_violations += 1,
            None => {}
        }
    }
}

/// Pending events by tier, registration order within a tier
#[derive(Debug, Default)]
struct ReadyQueue {
    tiers: BTreeMap<u32, Vec<Event>>,
}

impl ReadyQueue {
    fn push(&mut self, event: Event) {
        self.tiers.entry(event.priority()).or_default().push(event);
    }

    fn tier(&self, priority: u32) -> Vec<Event> {
        self.tiers.get(&priority).cloned().unwrap_or_default()
    }

    fn first_tier(&self) -> Option<u32> {
        self.tiers.keys().next().copied()
    }

    fn tier_after(&self, priority: u32) -> Option<u32> {
        let next = priority.checked_add(1)?;
        self.tiers.range(next..).next().map(|(p, _)| *p)
    }

    fn ceiling(&self) -> u32 {
        self.tiers.keys().next_back().copied().unwrap_or(0)
    }

    /// Drop terminal events and empty tiers; returns how many were dropped
    fn reap(&mut self) -> usize {
        let mut reaped = 0;
        self.tiers.retain(|_, events| {
            let before = events.len();
            events.retain(|e| !e.is_terminal());
            reaped += before - events.len();
            !events.is_empty()
        });
        reaped
    }

    fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    fn iter(&self) -> impl Iterator<Item = &Event> {
        self.tiers.values().flatten()
    }
}

/// Central scheduler: ready queue, priority sweep and idle policy
pub struct Scheduler {
    clock: SharedClock,
    queue: Mutex<ReadyQueue>,
    stats: Mutex<SchedulerStats>,
    /// Longest real-time sleep between ticks
    max_idle: Duration,
}

impl Scheduler {
    pub fn new(clock: SharedClock, max_idle: Duration) -> Self {
        Scheduler {
            clock,
            queue: Mutex::new(ReadyQueue::default()),
            stats: Mutex::new(SchedulerStats::default()),
            max_idle,
        }
    }

    /// Add an event to its tier and raise the priority ceiling
    pub fn register(&self, event: Event) {
        let priority = event.priority();
        trace!(event = %event.name(), priority, "event registered");
        self.queue.lock().push(event);
        self.clock.write().raise_ceiling(priority);
        self.stats.lock().registered += 1;
    }

    /// Run one full tick: sweep all tiers, reap, advance the clock
    pub async fn run_tick(&self) {
        self.clock.write().begin_tick();

        let mut tier = self.queue.lock().first_tier();
        while let Some(priority) = tier {
            self.clock.write().enter_tier(priority);
            let view = self.clock.view();

            let batch = self.queue.lock().tier(priority);
            for event in &batch {
                let slot = event.advance(&view).await;
                self.stats.lock().record(&slot);
            }

            // Tiers registered mid-sweep above this one still run this tick
            tier = self.queue.lock().tier_after(priority);
        }

        let (reaped, ceiling) = {
            let mut queue = self.queue.lock();
            let reaped = queue.reap();
            (reaped, queue.ceiling())
        };

        let mut clock = self.clock.write();
        clock.set_ceiling(ceiling);
        clock.end_tick();
        let (ticks, now) = (clock.tick_count(), clock.now());
        drop(clock);

        let mut stats = self.stats.lock();
        stats.ticks = ticks;
        stats.reaped += reaped as u64;
        drop(stats);

        if reaped > 0 {
            debug!(reaped, now = %now, "reaped terminal events");
        }
    }

    /// Wait before the next tick. Logical clocks only yield; real-time
    /// clocks sleep until the earliest known wake-up, capped by `max_idle`.
    pub async fn idle(&self) {
        let (realtime, now) = {
            let clock = self.clock.read();
            (clock.is_realtime(), clock.now())
        };
        if !realtime {
            tokio::task::yield_now().await;
            return;
        }

        let sleep = match self.next_wakeup() {
            Some(t) if t <= now => None,
            // Unbounded or far-future wake-ups wait at most `max_idle`
            Some(t) => Some(
                self.clock
                    .read()
                    .wall_until(t)
                    .map_or(self.max_idle, |d| d.min(self.max_idle)),
            ),
            None => Some(self.max_idle),
        };
        match sleep {
            Some(d) if !d.is_zero() => tokio::time::sleep(d).await,
            _ => tokio::task::yield_now().await,
        }
    }

    /// Earliest simulated time any pending event needs a slot
    pub fn next_wakeup(&self) -> Option<SimTime> {
        self.queue
            .lock()
            .iter()
            .filter_map(Event::wake_time)
            .fold(None, |acc: Option<SimTime>, t| match acc {
                Some(a) if a <= t => Some(a),
                _ => Some(t),
            })
    }

    /// Pending events in tier order
    pub fn pending(&self) -> Vec<Event> {
        self.queue.lock().iter().cloned().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_len() == 0
    }

    /// Cancel and drop every pending event
    pub fn clear(&self) -> usize {
        let events: Vec<Event> = {
            let mut queue = self.queue.lock();
            let events = queue.iter().cloned().collect();
            queue.tiers.clear();
            events
        };
        for event in &events {
            event.cancel();
        }
        self.clock.write().set_ceiling(0);
        events.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.lock().clone()
    }

    pub fn max_idle(&self) -> Duration {
        self.max_idle
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending_len())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, ClockConfig, Simulation};
    use proptest::prelude::*;

    fn sim() -> Simulation {
        Simulation::new(ClockConfig::simulated(1.0)).unwrap()
    }

    #[test]
    fn test_ready_queue_tiers() {
        let sim = sim();
        let mut queue = ReadyQueue::default();
        for p in [3, 0, 3, 7] {
            let ev = sim
                .event(0.0, 1.0, Action::noop())
                .priority(p)
                .schedule()
                .unwrap();
            queue.push(ev);
        }

        assert_eq!(queue.first_tier(), Some(0));
        assert_eq!(queue.tier_after(0), Some(3));
        assert_eq!(queue.tier_after(3), Some(7));
        assert_eq!(queue.tier_after(7), None);
        assert_eq!(queue.tier_after(u32::MAX), None);
        assert_eq!(queue.ceiling(), 7);
        assert_eq!(queue.tier(3).len(), 2);
        assert_eq!(queue.len(), 4);

        queue.tier(7)[0].cancel();
        assert_eq!(queue.reap(), 1);
        assert_eq!(queue.ceiling(), 3);
    }

    #[tokio::test]
    async fn test_tick_sweeps_tiers_and_reaps() {
        let sim = sim();
        let a = sim.event(0.0, 1.0, Action::noop()).schedule().unwrap();
        let b = sim
            .event(0.0, 2.0, Action::noop())
            .priority(4)
            .schedule()
            .unwrap();
        let scheduler = sim.scheduler();
        assert_eq!(sim.clock_handle().read().max_priority(), 4);

        scheduler.run_tick().await;
        assert_eq!(a.acts(), 1);
        assert_eq!(b.acts(), 1);

        // t=1: a ends
        scheduler.run_tick().await;
        assert!(a.is_ended());
        assert_eq!(scheduler.pending_len(), 1);

        // t=2: b ends, ceiling drops back to zero
        scheduler.run_tick().await;
        assert!(scheduler.is_idle());
        assert_eq!(sim.clock_handle().read().max_priority(), 0);

        let stats = scheduler.stats();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.acts, 3);
        assert_eq!(stats.ends, 2);
        assert_eq!(stats.reaped, 2);
        assert_eq!(stats.registered, 2);
    }

    #[test]
    fn test_next_wakeup() {
        let sim = sim();
        assert_eq!(sim.scheduler().next_wakeup(), None);
        sim.event(4.0, 9.0, Action::noop()).schedule().unwrap();
        sim.event(2.5, 9.0, Action::noop()).schedule().unwrap();
        assert_eq!(sim.scheduler().next_wakeup(), Some(SimTime(2.5)));
    }

    #[test]
    fn test_clear_cancels_pending() {
        let sim = sim();
        let a = sim.event(0.0, 9.0, Action::noop()).schedule().unwrap();
        assert_eq!(sim.scheduler().clear(), 1);
        assert!(a.is_cancelled());
        assert!(sim.scheduler().is_idle());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn window_acts_once_per_period(
            at in 0u32..20,
            len in 1u32..20,
            period in 1u32..4,
            priority in 0u32..4,
        ) {
            let sim = sim();
            let ev = sim
                .event(at as f64, (at + len) as f64, Action::noop())
                .step(period as f64)
                .priority(priority)
                .schedule()
                .unwrap();

            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(sim.run()).unwrap();

            prop_assert!(ev.is_ended());
            prop_assert_eq!(ev.acts(), len.div_ceil(period) as u64);
            let stats = sim.stats();
            prop_assert_eq!(stats.acts, ev.acts());
            prop_assert_eq!(stats.ticks, (at + len + 1) as u64);
            prop_assert!(sim.scheduler().is_idle());
        }
    }
}
