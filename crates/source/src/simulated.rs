//! Deterministic stand-in for the browser-backed fare source.
//!
//! Real deployments inject a scraping implementation of [`FareSource`];
//! this one fabricates a plausible timetable so the monitor runs end to
//! end without a browser. Prices drift with an internal counter, so
//! repeated cycles occasionally dip below a typical alert threshold.

use crate::{FareSource, SessionOptions, SourceError};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use farewatch_core::{RawFare, Station};
use tracing::{debug, info};

/// Simulated fare source generating one train per hour, 06:00 through
/// 18:00, with deterministic counter-driven prices.
#[derive(Debug)]
pub struct SimulatedSource {
    options: SessionOptions,
    opened: bool,
    counter: u64,
}

impl SimulatedSource {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            opened: false,
            counter: 0,
        }
    }

    fn fare_for(&self, date: NaiveDate, hour: u32) -> RawFare {
        // Same (cycle, date, hour) always yields the same fare.
        let seed = self
            .counter
            .wrapping_add(u64::from(hour) * 7)
            .wrapping_add(u64::from(date.ordinal()) * 13);
        let cents = 1_500 + (seed.wrapping_mul(37) % 2_600) as i64;

        // Alternate 24-hour and 12-hour renderings, as the booking site
        // has been observed serving both.
        let departure = if hour % 2 == 0 {
            format!("{hour:02}:10")
        } else {
            let marker = if hour >= 12 { "PM" } else { "AM" };
            let hour12 = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{hour12}:10 {marker}")
        };
        let arrival = format!("{:02}:20", (hour + 1) % 24);

        RawFare {
            train_number: Some((600 + hour * 2).to_string()),
            departure_time: Some(departure),
            arrival_time: Some(arrival),
            duration: Some("1h 10m".to_string()),
            price_text: Some(format!("${}.{:02}", cents / 100, cents % 100)),
        }
    }
}

#[async_trait]
impl FareSource for SimulatedSource {
    async fn search(
        &mut self,
        origin: &Station,
        destination: &Station,
        date: NaiveDate,
    ) -> Result<Vec<RawFare>, SourceError> {
        if !self.opened {
            info!(headless = self.options.headless, "simulated session opened");
            self.opened = true;
        }
        self.counter += 1;

        let fares: Vec<RawFare> = (6..=18).map(|hour| self.fare_for(date, hour)).collect();
        debug!(
            origin = %origin.code,
            destination = %destination.code,
            date = %date,
            count = fares.len(),
            "simulated search"
        );
        Ok(fares)
    }

    async fn close(&mut self) {
        if self.opened {
            info!("simulated session closed");
            self.opened = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farewatch_core::FareRecord;

    fn station(code: &str) -> Station {
        Station::new(code, code)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn test_deterministic_across_sources() {
        let mut a = SimulatedSource::new(SessionOptions::default());
        let mut b = SimulatedSource::new(SessionOptions::default());
        let fares_a = a.search(&station("PJC"), &station("PHL"), date()).await.unwrap();
        let fares_b = b.search(&station("PJC"), &station("PHL"), date()).await.unwrap();
        assert_eq!(fares_a, fares_b);
    }

    #[tokio::test]
    async fn test_prices_drift_between_searches() {
        let mut source = SimulatedSource::new(SessionOptions::default());
        let first = source.search(&station("PJC"), &station("PHL"), date()).await.unwrap();
        let second = source.search(&station("PJC"), &station("PHL"), date()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_every_candidate_normalizes() {
        let mut source = SimulatedSource::new(SessionOptions::default());
        let fares = source.search(&station("PJC"), &station("PHL"), date()).await.unwrap();
        assert_eq!(fares.len(), 13);
        for raw in &fares {
            FareRecord::from_raw(raw, date()).unwrap();
        }
    }

    #[tokio::test]
    async fn test_session_open_close() {
        let mut source = SimulatedSource::new(SessionOptions { headless: false });
        assert!(!source.opened);
        let _ = source.search(&station("PJC"), &station("PHL"), date()).await;
        assert!(source.opened);
        source.close().await;
        assert!(!source.opened);
        source.close().await; // idempotent
        assert!(!source.opened);
    }
}
