//! Departure-time windows.

use chrono::NaiveTime;
use thiserror::Error;

/// Error returned when no supported format matches a time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to parse time `{0}`")]
pub struct TimeParseError(pub String);

/// Error returned for an inverted window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("window start {start} is after end {end}")]
pub struct TimeWindowError {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Formats accepted for scraped clock times, tried in priority order. The
/// fare source's textual format is not contractually stable, so 24-hour
/// and 12-hour renderings (with and without a space before the am/pm
/// marker) are all accepted.
const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p", "%H:%M:%S"];

/// Parse a clock time, returning the first format that matches.
pub fn parse_time(text: &str) -> Result<NaiveTime, TimeParseError> {
    let cleaned = text.trim().to_uppercase();
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(&cleaned, format) {
            return Ok(time);
        }
    }
    Err(TimeParseError(text.trim().to_string()))
}

/// Inclusive `[start, end]` clock-time range.
///
/// Same-day only: windows never wrap around midnight, so the constructor
/// rejects `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TimeWindowError> {
        if start > end {
            return Err(TimeWindowError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// True iff `start <= t <= end`, inclusive on both ends.
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}
