//! Canned fare source for tests.

use crate::{FareSource, SourceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use farewatch_core::{RawFare, Station};
use std::collections::VecDeque;

/// Fare source that replays queued results in order.
///
/// Each `search` pops the next queued batch or failure; once the queue is
/// empty every query yields an empty batch.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Result<Vec<RawFare>, SourceError>>,
    queries: Vec<(String, String, NaiveDate)>,
    closed: bool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful batch.
    pub fn push_batch(&mut self, batch: Vec<RawFare>) {
        self.queue.push_back(Ok(batch));
    }

    /// Queue a failure.
    pub fn push_failure(&mut self, error: SourceError) {
        self.queue.push_back(Err(error));
    }

    /// Queries observed so far, as (origin code, destination code, date).
    pub fn queries(&self) -> &[(String, String, NaiveDate)] {
        &self.queries
    }

    /// True once `close` has been called with no `search` since.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl FareSource for ScriptedSource {
    async fn search(
        &mut self,
        origin: &Station,
        destination: &Station,
        date: NaiveDate,
    ) -> Result<Vec<RawFare>, SourceError> {
        self.closed = false;
        self.queries
            .push((origin.code.clone(), destination.code.clone(), date));
        self.queue.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(code: &str) -> Station {
        Station::new(code, code)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn test_replays_in_order_then_empties() {
        let mut source = ScriptedSource::new();
        source.push_batch(vec![RawFare::default()]);
        source.push_failure(SourceError::Timeout("results".into()));

        let first = source
            .search(&station("PJC"), &station("PHL"), date())
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = source.search(&station("PJC"), &station("PHL"), date()).await;
        assert!(second.is_err());

        let third = source
            .search(&station("PJC"), &station("PHL"), date())
            .await
            .unwrap();
        assert!(third.is_empty());

        assert_eq!(source.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_close_tracking() {
        let mut source = ScriptedSource::new();
        assert!(!source.is_closed());
        source.close().await;
        assert!(source.is_closed());
        let _ = source.search(&station("PJC"), &station("PHL"), date()).await;
        assert!(!source.is_closed());
    }
}
