//! Action recorder

use std::sync::Arc;

use kairos_core::SimTime;
use kairos_runtime::{Action, Simulation};
use parking_lot::Mutex;

/// One recorded act
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub label: String,
    pub time: SimTime,
    /// Tier the clock had open when the action ran
    pub tier: u32,
}

/// Shared, thread-safe log of acts in invocation order
#[derive(Clone, Default)]
pub struct ActionRecorder {
    records: Arc<Mutex<Vec<Record>>>,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immediate action recording `label` with the current clock state
    pub fn action(&self, sim: &Simulation, label: &str) -> Action {
        let records = Arc::clone(&self.records);
        let sim = sim.clone();
        let label = label.to_string();
        Action::immediate(move || {
            let view = sim.clock();
            records.lock().push(Record {
                label: label.clone(),
                time: view.now,
                tier: view.current_priority,
            });
        })
    }

    /// Deferred action that blocks for `delay` before recording
    pub fn blocking_action(
        &self,
        sim: &Simulation,
        label: &str,
        delay: std::time::Duration,
    ) -> Action {
        let records = Arc::clone(&self.records);
        let sim = sim.clone();
        let label = label.to_string();
        Action::deferred(move || {
            std::thread::sleep(delay);
            let view = sim.clock();
            records.lock().push(Record {
                label: label.clone(),
                time: view.now,
                tier: view.current_priority,
            });
        })
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Times at which `label` acted
    pub fn times_of(&self, label: &str) -> Vec<SimTime> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.label == label)
            .map(|r| r.time)
            .collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.records.lock().iter().filter(|r| r.label == label).count()
    }

    /// Labels in invocation order
    pub fn labels(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}
