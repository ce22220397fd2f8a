//! Kairos Test Harness - Scenario and property testing for the scheduler
//!
//! This crate provides:
//! - An action recorder that logs who acted, when, and in which tier
//! - Ready-made scenarios (tick windows, dependency chains, priority
//!   pairs, real-time overruns)
//! - Seeded random workloads for property checks

pub mod recorder;
pub mod scenarios;
pub mod stress;

pub use recorder::*;
pub use stress::*;
