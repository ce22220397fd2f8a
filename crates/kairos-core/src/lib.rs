//! Kairos Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by the scheduler crates:
//! - Identifiers (EventId)
//! - Simulated time and decimal time resolution
//! - Event lifecycle flags
//! - Deadline violations and error types

pub mod id;
pub mod time;
pub mod lifecycle;
pub mod error;

pub use id::*;
pub use time::*;
pub use lifecycle::*;
pub use error::*;
