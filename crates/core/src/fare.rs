//! Scraped fare observations and their normalization.

use crate::money::{Money, MoneyParseError};
use crate::time_window::{parse_time, TimeParseError};
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Loosely-typed fare candidate as handed over by a fare source.
///
/// Every field is optional: sources scrape them out of markup that may be
/// missing pieces. [`FareRecord::from_raw`] decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFare {
    pub train_number: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub price_text: Option<String>,
}

/// Error for a single malformed fare candidate.
///
/// Always record-local: a failing candidate is skipped, never aborting the
/// batch it arrived in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("bad {field}: {source}")]
    Time {
        field: &'static str,
        source: TimeParseError,
    },
    #[error("bad price: {0}")]
    Price(#[from] MoneyParseError),
}

/// One normalized fare observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareRecord {
    pub train_number: String,
    pub travel_date: NaiveDate,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    /// Opaque duration text as scraped, e.g. "1h 10m". May be empty.
    pub duration: String,
    pub price: Money,
}

impl FareRecord {
    /// Normalize a raw candidate for the given travel date.
    ///
    /// Departure and arrival must parse into clock times and the price
    /// into a non-negative amount; the duration is carried verbatim.
    pub fn from_raw(raw: &RawFare, travel_date: NaiveDate) -> Result<Self, RecordParseError> {
        let train_number = field(&raw.train_number, "train_number")?.to_string();
        let departure = parse_time(field(&raw.departure_time, "departure_time")?)
            .map_err(|source| RecordParseError::Time {
                field: "departure_time",
                source,
            })?;
        let arrival = parse_time(field(&raw.arrival_time, "arrival_time")?).map_err(|source| {
            RecordParseError::Time {
                field: "arrival_time",
                source,
            }
        })?;
        let price = Money::parse(field(&raw.price_text, "price")?)?;

        Ok(Self {
            train_number,
            travel_date,
            departure,
            arrival,
            duration: raw.duration.clone().unwrap_or_default(),
            price,
        })
    }
}

fn field<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, RecordParseError> {
    value.as_deref().ok_or(RecordParseError::MissingField(name))
}
