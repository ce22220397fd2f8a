//! Kairos Runtime - Cooperative event scheduler
//!
//! Each simulated tick runs the same sequence:
//! 1. Sync the clock (wall clock in real-time mode)
//! 2. Sweep priority tiers in ascending order
//! 3. Give every event of the open tier one processing slot
//!    (start check, act check with deadline enforcement, end check)
//! 4. Reap ended and cancelled events, lower the priority ceiling
//! 5. Advance simulated time (logical mode) and yield or sleep

pub mod action;
pub mod config;
pub mod event;
pub mod logging;
pub mod scheduler;
pub mod simulation;
pub mod watchdog;

pub use action::*;
pub use config::*;
pub use event::*;
pub use logging::*;
pub use scheduler::*;
pub use simulation::*;
pub use watchdog::*;

pub use kairos_core::{
    DeadlineViolation, EventId, KairosError, KairosResult, Lifecycle, SimTime, ViolationKind,
};
pub use kairos_time::{ClockConfig, ClockView};
