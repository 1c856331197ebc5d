//! One route/date check.

use chrono::{NaiveDate, Utc};
use farewatch_alerts::{format_alert_message, AlertPolicy, Notifier};
use farewatch_core::{FareRecord, RouteSpec};
use farewatch_source::FareSource;
use farewatch_store::{NotificationEntry, PriceHistoryEntry, Store, StoreError};
use tracing::{error, info, warn};

/// Run one (route, travel date) check: pull candidates from the source,
/// normalize them, filter by the departure window, persist observations,
/// and fire qualifying alerts.
///
/// Source failures degrade to an empty result set; malformed candidates
/// are skipped individually; only storage failures abort the check.
/// Returns the records that passed the window filter.
pub async fn check_route<S, N>(
    source: &mut S,
    store: &Store,
    notifier: &N,
    policy: &AlertPolicy,
    spec: &RouteSpec,
    travel_date: NaiveDate,
) -> Result<Vec<FareRecord>, StoreError>
where
    S: FareSource + ?Sized,
    N: Notifier + ?Sized,
{
    let candidates = match source
        .search(&spec.origin, &spec.destination, travel_date)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(
                route = %spec.label,
                date = %travel_date,
                error = %e,
                "fare source failed, skipping check"
            );
            return Ok(Vec::new());
        }
    };

    let mut kept = Vec::new();
    for raw in &candidates {
        let record = match FareRecord::from_raw(raw, travel_date) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    route = %spec.label,
                    date = %travel_date,
                    error = %e,
                    "skipping malformed fare candidate"
                );
                continue;
            }
        };
        // Departures outside the window are dropped without persisting.
        if spec.window.contains(record.departure) {
            kept.push(record);
        }
    }

    for record in &kept {
        store
            .record_observation(&PriceHistoryEntry {
                id: 0,
                observed_at: Utc::now(),
                travel_date: record.travel_date,
                origin: spec.origin.code.clone(),
                destination: spec.destination.code.clone(),
                departure_time: record.departure,
                arrival_time: record.arrival,
                train_number: record.train_number.clone(),
                duration: record.duration.clone(),
                price: record.price,
                route_label: spec.label.clone(),
            })
            .await?;

        if policy.should_alert(record, &spec.label, store).await? {
            let message = format_alert_message(
                &spec.label,
                &spec.origin.name,
                &spec.destination.name,
                record.travel_date,
                &record.train_number,
                record.departure,
                record.price,
            );
            info!(
                route = %spec.label,
                date = %travel_date,
                train = %record.train_number,
                price = %record.price,
                "fare below threshold, sending alert"
            );
            match notifier.send(&message).await {
                Ok(()) => {
                    store
                        .record_notification(&NotificationEntry {
                            id: 0,
                            sent_at: Utc::now(),
                            travel_date: record.travel_date,
                            route_label: spec.label.clone(),
                            train_number: record.train_number.clone(),
                            price: record.price,
                            message,
                        })
                        .await?;
                }
                Err(e) => {
                    // Leave the ledger untouched so the next cycle retries.
                    error!(
                        route = %spec.label,
                        date = %travel_date,
                        train = %record.train_number,
                        error = %e,
                        "alert delivery failed"
                    );
                }
            }
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use farewatch_alerts::DeliveryError;
    use farewatch_core::{RawFare, Station, TimeWindow};
    use farewatch_source::{ScriptedSource, SourceError};
    use chrono::NaiveTime;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &str) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _message: &str) -> Result<(), DeliveryError> {
            Err(DeliveryError::Transport("unreachable".to_string()))
        }
    }

    fn spec() -> RouteSpec {
        RouteSpec {
            origin: Station::new("PJC", "Princeton Junction"),
            destination: Station::new("PHL", "Philadelphia, PA - 30th Street Station"),
            window: TimeWindow::new(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            )
            .unwrap(),
            label: "MORNING_OUTBOUND".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn raw(train: &str, departure: &str, price: &str) -> RawFare {
        RawFare {
            train_number: Some(train.to_string()),
            departure_time: Some(departure.to_string()),
            arrival_time: Some("09:22".to_string()),
            duration: Some("1h 10m".to_string()),
            price_text: Some(price.to_string()),
        }
    }

    async fn store() -> Store {
        Store::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_repeat_observation_alerts_once() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_batch(vec![raw("123", "08:12", "$19.99")]);
        source.push_batch(vec![raw("123", "08:12", "$19.99")]);

        // Observed twice within the dedup window.
        for _ in 0..2 {
            let found = check_route(&mut source, &store, &notifier, &policy, &spec(), date())
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
        }

        assert_eq!(store.observation_count().await.unwrap(), 2);
        assert_eq!(store.notification_count().await.unwrap(), 1);
        assert_eq!(notifier.sent().len(), 1);
        assert!(notifier.sent()[0].contains("Train 123"));
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_batch(vec![
            raw("123", "08:12", "$20.00"),
            raw("127", "08:20", "$19.99"),
        ]);

        check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();

        // Only the fare one cent below the threshold alerts; both are
        // persisted.
        assert_eq!(store.observation_count().await.unwrap(), 2);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Train 127"));
    }

    #[tokio::test]
    async fn test_source_failure_degrades_to_empty() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_failure(SourceError::NoResults {
            origin: "PJC".to_string(),
            destination: "PHL".to_string(),
            date: date(),
        });

        let found = check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();

        assert!(found.is_empty());
        assert_eq!(store.observation_count().await.unwrap(), 0);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_candidate_skipped_individually() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();

        let mut bad = raw("125", "08:15", "$25.00");
        bad.price_text = Some("call for price".to_string());
        source.push_batch(vec![
            raw("121", "08:05", "$25.00"),
            raw("123", "08:10", "$25.00"),
            bad,
            raw("127", "08:20", "$25.00"),
            raw("129", "08:25", "$25.00"),
        ]);

        let found = check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();

        assert_eq!(found.len(), 4);
        assert_eq!(store.observation_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_window_filter_drops_without_persisting() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_batch(vec![
            raw("119", "07:45", "$19.99"),
            raw("123", "08:15", "$25.00"),
            raw("131", "8:45 AM", "$19.99"),
        ]);

        let found = check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].train_number, "123");
        assert_eq!(store.observation_count().await.unwrap(), 1);
        // The cheap out-of-window fares never alert.
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_allows_retry() {
        let store = store().await;
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_batch(vec![raw("123", "08:12", "$19.99")]);
        source.push_batch(vec![raw("123", "08:12", "$19.99")]);

        // First delivery fails: nothing recorded in the ledger.
        check_route(&mut source, &store, &FailingNotifier, &policy, &spec(), date())
            .await
            .unwrap();
        assert_eq!(store.notification_count().await.unwrap(), 0);

        // Next cycle retries and succeeds.
        let notifier = RecordingNotifier::default();
        check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();
        assert_eq!(store.notification_count().await.unwrap(), 1);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_alert_message_contents() {
        let store = store().await;
        let notifier = RecordingNotifier::default();
        let policy = AlertPolicy::default();
        let mut source = ScriptedSource::new();
        source.push_batch(vec![raw("123", "08:12", "$19.99")]);

        check_route(&mut source, &store, &notifier, &policy, &spec(), date())
            .await
            .unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("MORNING_OUTBOUND"));
        assert!(sent[0].contains("Princeton Junction"));
        assert!(sent[0].contains("Date: 2024-06-10"));
        assert!(sent[0].contains("$19.99"));
    }
}
