//! Fare source abstraction.
//!
//! The scraping mechanics of the booking site (navigation, selectors,
//! waits) live entirely behind the [`FareSource`] trait; the monitoring
//! pipeline only pulls candidate batches from it and never depends on how
//! they were obtained.

pub mod error;
pub mod scripted;
pub mod simulated;

pub use error::SourceError;
pub use scripted::ScriptedSource;
pub use simulated::SimulatedSource;

use async_trait::async_trait;
use chrono::NaiveDate;
use farewatch_core::{RawFare, Station};

/// Options forwarded verbatim to the underlying scraping session. The
/// pipeline never interprets them.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub headless: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { headless: true }
    }
}

/// Produces raw fare candidates for a (origin, destination, date) query.
///
/// Implementations typically hold a stateful browser session. Queries are
/// issued strictly one at a time; `close` releases the session at the end
/// of every cycle and must be idempotent.
#[async_trait]
pub trait FareSource: Send {
    /// Query fares for one route and travel date.
    async fn search(
        &mut self,
        origin: &Station,
        destination: &Station,
        date: NaiveDate,
    ) -> Result<Vec<RawFare>, SourceError>;

    /// Release any session held by the source.
    async fn close(&mut self);
}
