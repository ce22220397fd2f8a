//! Seeded random workloads
//!
//! Builds a mix of repeating, once-only and dependent events over a
//! logical clock so that ordering and terminality properties can be
//! checked on schedules nobody wrote by hand.

use kairos_core::SimTime;
use kairos_runtime::{ClockConfig, Event, KairosResult, Simulation, Trigger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ActionRecorder;

/// Workload shape
#[derive(Clone, Debug)]
pub struct StressConfig {
    pub events: usize,
    /// Priorities are drawn from `0..=max_priority`
    pub max_priority: u32,
    /// Latest numeric start time
    pub horizon: f64,
    pub time_step: f64,
    /// Probability an event is once-only
    pub once_prob: f64,
    /// Probability an event starts after an earlier one instead of at a time
    pub dependency_prob: f64,
    /// Probability an event carries its own step
    pub step_prob: f64,
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            events: 50,
            max_priority: 4,
            horizon: 20.0,
            time_step: 0.5,
            once_prob: 0.2,
            dependency_prob: 0.2,
            step_prob: 0.3,
            seed: 42,
        }
    }
}

/// One generated event with the parameters it was built from
#[derive(Clone, Debug)]
pub struct PlannedEvent {
    pub label: String,
    pub event: Event,
    /// Index of the event it starts after, if any
    pub after: Option<usize>,
    pub at: Option<f64>,
    pub till: f64,
}

/// A generated simulation
pub struct StressWorkload {
    pub sim: Simulation,
    pub recorder: ActionRecorder,
    pub events: Vec<PlannedEvent>,
}

impl StressWorkload {
    pub fn build(config: &StressConfig) -> KairosResult<Self> {
        let sim = Simulation::new(ClockConfig::simulated(config.time_step))?;
        let recorder = ActionRecorder::new();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut events: Vec<PlannedEvent> = Vec::with_capacity(config.events);

        for i in 0..config.events {
            let label = format!("e{}", i);
            let priority = rng.gen_range(0..=config.max_priority);

            let (at, after) = if i > 0 && rng.gen_bool(config.dependency_prob) {
                let dep = rng.gen_range(0..i);
                (Trigger::After(events[dep].event.clone()), Some(dep))
            } else {
                let t = (rng.gen_range(0.0..config.horizon) / config.time_step).floor()
                    * config.time_step;
                (Trigger::Time(SimTime(t)), None)
            };
            let start = at.time().map(|t| t.0);
            let till = start.unwrap_or(0.0) + config.horizon + rng.gen_range(1.0..10.0);

            let mut builder = sim
                .event(at, till, recorder.action(&sim, &label))
                .label(label.clone())
                .priority(priority);
            if rng.gen_bool(config.once_prob) {
                builder = builder.once();
            }
            if rng.gen_bool(config.step_prob) {
                builder = builder.step(config.time_step * rng.gen_range(1..4) as f64);
            }

            events.push(PlannedEvent {
                label,
                event: builder.schedule()?,
                after,
                at: start,
                till,
            });
        }

        Ok(StressWorkload {
            sim,
            recorder,
            events,
        })
    }

    /// Latest end time across all events; the workload is done by then
    pub fn latest_end(&self) -> f64 {
        self.events.iter().map(|e| e.till).fold(0.0, f64::max)
    }
}
