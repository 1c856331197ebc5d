//! Core data types for the fare monitor.

pub mod fare;
pub mod money;
pub mod route;
pub mod time_window;

pub use fare::*;
pub use money::*;
pub use route::*;
pub use time_window::*;
