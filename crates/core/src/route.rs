//! Stations and monitored routes.

use crate::time_window::TimeWindow;
use serde::{Deserialize, Serialize};

/// A station, identified by its booking code, with a display name used in
/// alert messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub name: String,
}

impl Station {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// One monitored (origin, destination, departure window, label) tuple,
/// checked once per qualifying travel date per cycle.
///
/// The label tags persisted observations and notifications; deduplication
/// is keyed on it, so the same physical train showing up under two labels
/// alerts independently per label.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub origin: Station,
    pub destination: Station,
    pub window: TimeWindow,
    pub label: String,
}
