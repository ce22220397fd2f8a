//! Error types for Kairos

use thiserror::Error;

use crate::{EventId, LifecycleError};

/// Kind of a missed real-time deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    WaitingTime,
    ExecutionTime,
    EventDuration,
}

/// A real-time-strict event overran its step.
///
/// Raised and handled inside the event's own processing slot; it never
/// reaches the scheduler's caller.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DeadlineViolation {
    #[error("waited {waited:.6}s for a slot, step is {step}s")]
    ExceedWaitingTime { waited: f64, step: f64 },

    #[error("action ran for {elapsed:.6}s, step is {step}s")]
    ExceedExecutionTime { elapsed: f64, step: f64 },

    #[error("waiting plus execution took {total:.6}s, step is {step}s")]
    ExceedEventDuration { total: f64, step: f64 },
}

impl DeadlineViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            DeadlineViolation::ExceedWaitingTime { .. } => ViolationKind::WaitingTime,
            DeadlineViolation::ExceedExecutionTime { .. } => ViolationKind::ExecutionTime,
            DeadlineViolation::ExceedEventDuration { .. } => ViolationKind::EventDuration,
        }
    }

    /// Seconds beyond the allotted step
    pub fn overrun(&self) -> f64 {
        match *self {
            DeadlineViolation::ExceedWaitingTime { waited, step } => waited - step,
            DeadlineViolation::ExceedExecutionTime { elapsed, step } => elapsed - step,
            DeadlineViolation::ExceedEventDuration { total, step } => total - step,
        }
    }
}

/// Core Kairos errors
#[derive(Error, Debug)]
pub enum KairosError {
    // Configuration errors
    #[error("Invalid time step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f64),

    #[error("Invalid time resolution: {0} decimal places")]
    InvalidResolution(u32),

    #[error("Invalid event step: {0} (must be finite and > 0)")]
    InvalidStep(f64),

    #[error("Invalid {which} bound: {value}")]
    InvalidBound { which: &'static str, value: f64 },

    #[error("Config error: {0}")]
    Config(String),

    // Event errors
    #[error("Lifecycle violation: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Action of {event} panicked: {reason}")]
    ActionPanicked { event: EventId, reason: String },

    // Simulation errors
    #[error("Simulation is not running")]
    SimulationNotRunning,

    #[error("Simulation is already running")]
    SimulationAlreadyRunning,

    #[error("Simulation is already being driven")]
    DriverBusy,
}

/// Result type for Kairos operations
pub type KairosResult<T> = Result<T, KairosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrun() {
        let v = DeadlineViolation::ExceedExecutionTime {
            elapsed: 0.05,
            step: 0.01,
        };
        assert_eq!(v.kind(), ViolationKind::ExecutionTime);
        assert!((v.overrun() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_lifecycle_conversion() {
        let err: KairosError = LifecycleError::EndedBeforeStart.into();
        assert!(err.to_string().contains("ended without having started"));
    }
}
