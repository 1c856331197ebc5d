//! Fare source failure modes.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure of a single fare-source query.
///
/// Always check-local: the route check logs it and proceeds with an empty
/// result set. Scrape failures against an uncooperative site degrade, they
/// are not recovered.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("timed out waiting for {0}")]
    Timeout(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("no results for {origin} -> {destination} on {date}")]
    NoResults {
        origin: String,
        destination: String,
        date: NaiveDate,
    },
    #[error("session error: {0}")]
    Session(String),
}
