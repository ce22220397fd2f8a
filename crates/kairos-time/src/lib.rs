//! Kairos Time - Simulation clock and priority gate
//!
//! This crate implements the clock every event reads:
//! - Logical mode: time advances by a fixed step once all priority tiers have run
//! - Real-time mode: time follows a monotonic wall-clock anchor
//! - Priority gate: only the tier named by `current_priority` may act
//! - Shared handle for reading the clock from outside the driver

pub mod clock;
pub mod engine;

pub use clock::*;
pub use engine::*;
