//! Application configuration.

use farewatch_core::{parse_time, Money, RouteSpec, Station, TimeParseError, TimeWindow, TimeWindowError};
use farewatch_engine::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("route `{label}`: {source}")]
    WindowTime {
        label: String,
        source: TimeParseError,
    },
    #[error("route `{label}`: {source}")]
    Window {
        label: String,
        source: TimeWindowError,
    },
}

/// One monitored route as configured on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSettings {
    pub origin: Station,
    pub destination: Station,
    /// Earliest departure, e.g. "08:00".
    pub window_start: String,
    /// Latest departure, inclusive.
    pub window_end: String,
    pub label: String,
}

impl RouteSettings {
    fn to_spec(&self) -> Result<RouteSpec, ConfigError> {
        let start = parse_time(&self.window_start).map_err(|source| ConfigError::WindowTime {
            label: self.label.clone(),
            source,
        })?;
        let end = parse_time(&self.window_end).map_err(|source| ConfigError::WindowTime {
            label: self.label.clone(),
            source,
        })?;
        let window = TimeWindow::new(start, end).map_err(|source| ConfigError::Window {
            label: self.label.clone(),
            source,
        })?;
        Ok(RouteSpec {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            window,
            label: self.label.clone(),
        })
    }
}

/// Application configuration, loaded from a JSON file with CLI overrides
/// applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Price threshold in dollars.
    pub threshold_usd: f64,
    /// Minutes between cycles in continuous mode.
    pub check_interval_minutes: u64,
    /// Hours during which repeat alerts for the same train are suppressed.
    pub dedup_window_hours: i64,
    /// Qualifying travel dates covered per cycle.
    pub dates_per_cycle: usize,
    /// Seconds between consecutive source queries.
    pub pacing_seconds: u64,
    /// Seconds to wait after a failed cycle.
    pub backoff_seconds: u64,
    /// SQLite database URL.
    pub database_url: String,
    /// Run the source session headless.
    pub headless: bool,
    /// Monitored routes, checked in order.
    pub routes: Vec<RouteSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threshold_usd: 20.0,
            check_interval_minutes: 120,
            dedup_window_hours: 24,
            dates_per_cycle: 5,
            pacing_seconds: 3,
            backoff_seconds: 300,
            database_url: "sqlite://fares.db".to_string(),
            headless: true,
            routes: default_routes(),
        }
    }
}

fn default_routes() -> Vec<RouteSettings> {
    let princeton = Station::new("PJC", "Princeton Junction");
    let philadelphia = Station::new("PHL", "Philadelphia, PA - 30th Street Station");
    let trenton = Station::new("TRE", "Trenton");

    vec![
        RouteSettings {
            origin: princeton.clone(),
            destination: philadelphia.clone(),
            window_start: "08:00".to_string(),
            window_end: "08:30".to_string(),
            label: "MORNING_OUTBOUND".to_string(),
        },
        RouteSettings {
            origin: philadelphia.clone(),
            destination: princeton,
            window_start: "14:00".to_string(),
            window_end: "17:00".to_string(),
            label: "AFTERNOON_RETURN_PJC".to_string(),
        },
        RouteSettings {
            origin: philadelphia,
            destination: trenton,
            window_start: "14:00".to_string(),
            window_end: "17:00".to_string(),
            label: "AFTERNOON_RETURN_TRE".to_string(),
        },
    ]
}

impl AppConfig {
    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Map into the engine configuration.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let routes = self
            .routes
            .iter()
            .map(RouteSettings::to_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MonitorConfig {
            threshold: Money::from_f64(self.threshold_usd),
            check_interval: Duration::from_secs(self.check_interval_minutes * 60),
            dedup_window_hours: self.dedup_window_hours,
            dates_per_cycle: self.dates_per_cycle,
            pacing: Duration::from_secs(self.pacing_seconds),
            backoff: Duration::from_secs(self.backoff_seconds),
            routes,
            headless: self.headless,
        })
    }
}
