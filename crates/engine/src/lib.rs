//! Fare monitoring engine.
//!
//! This crate contains the orchestration logic: per-route checks, the
//! qualifying travel-date enumeration, and the cycle scheduler that paces
//! checks against the external fare source.

pub mod check;
pub mod cycle;
pub mod schedule;

pub use check::*;
pub use cycle::*;
pub use schedule::*;
