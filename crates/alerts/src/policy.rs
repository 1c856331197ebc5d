//! Alert decision.

use farewatch_core::{FareRecord, Money};
use farewatch_store::{Store, StoreError};

/// Decides whether an observed fare is alert-worthy and not a duplicate.
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    /// Alert on fares strictly below this amount.
    pub threshold: Money,
    /// Suppress repeat alerts for the same (date, route label, train)
    /// within this many hours.
    pub dedup_window_hours: i64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: Money::from_parts(20, 0),
            dedup_window_hours: 24,
        }
    }
}

impl AlertPolicy {
    pub fn new(threshold: Money, dedup_window_hours: i64) -> Self {
        Self {
            threshold,
            dedup_window_hours,
        }
    }

    /// True iff the fare is strictly below the threshold and no
    /// notification for its (travel date, route label, train number) was
    /// sent within the dedup window.
    pub async fn should_alert(
        &self,
        fare: &FareRecord,
        route_label: &str,
        store: &Store,
    ) -> Result<bool, StoreError> {
        if fare.price >= self.threshold {
            return Ok(false);
        }

        let already_sent = store
            .has_recent_notification(
                fare.travel_date,
                route_label,
                &fare.train_number,
                self.dedup_window_hours,
            )
            .await?;

        Ok(!already_sent)
    }
}
