//! Persisted rows.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use farewatch_core::Money;

/// One observed fare.
///
/// Appended for every record that passes the departure-window filter,
/// regardless of whether it triggered an alert. Rows are never mutated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistoryEntry {
    /// Database ID (assigned on insert).
    pub id: i64,
    pub observed_at: DateTime<Utc>,
    pub travel_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub train_number: String,
    pub duration: String,
    pub price: Money,
    pub route_label: String,
}

/// One delivered alert.
///
/// Appended only after the transport confirms delivery; the dedup check
/// reads this table, so a speculative row would suppress the retry a
/// failed delivery is entitled to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    /// Database ID (assigned on insert).
    pub id: i64,
    pub sent_at: DateTime<Utc>,
    pub travel_date: NaiveDate,
    pub route_label: String,
    pub train_number: String,
    pub price: Money,
    pub message: String,
}
