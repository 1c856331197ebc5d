//! Fixed-point currency amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a price string cannot be read as a currency amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount `{0}`")]
    Invalid(String),
    #[error("negative amount `{0}`")]
    Negative(String),
}

/// Currency amount in integer cents.
///
/// Fares are compared exactly against the alert threshold, so amounts are
/// kept in fixed-point rather than `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(pub i64);

impl Money {
    /// Cents per dollar.
    pub const SCALE: i64 = 100;

    /// Create from whole dollars and cents.
    pub fn from_parts(dollars: i64, cents: i64) -> Self {
        Self(dollars * Self::SCALE + cents)
    }

    /// Create from f64 (for configuration/tests; rounds to the nearest cent).
    pub fn from_f64(value: f64) -> Self {
        Self((value * Self::SCALE as f64).round() as i64)
    }

    /// Convert to f64 (for display/debugging).
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Parse a scraped price string.
    ///
    /// Currency symbols and thousands separators are stripped first, so
    /// `"$1,234.56"` parses as 123456 cents. Fares are never negative;
    /// negative amounts are rejected.
    pub fn parse(text: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::Invalid(text.trim().to_string());

        let cleaned: String = text
            .trim()
            .chars()
            .filter(|c| *c != '$' && *c != ',')
            .collect();
        if cleaned.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if cleaned.starts_with('-') {
            return Err(MoneyParseError::Negative(text.trim().to_string()));
        }

        let (dollars_text, cents_text) = match cleaned.split_once('.') {
            Some((dollars, cents)) => (dollars, cents),
            None => (cleaned.as_str(), ""),
        };

        let dollars: i64 = if dollars_text.is_empty() {
            0
        } else {
            dollars_text.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match cents_text.len() {
            0 => 0,
            1 => cents_text.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => cents_text.parse().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        Ok(Self(dollars * Self::SCALE + cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Money::parse("19.99"), Ok(Money(1999)));
        assert_eq!(Money::parse("20"), Ok(Money(2000)));
        assert_eq!(Money::parse("19.9"), Ok(Money(1990)));
        assert_eq!(Money::parse(".99"), Ok(Money(99)));
    }

    #[test]
    fn test_parse_strips_symbols() {
        assert_eq!(Money::parse("$19.99"), Ok(Money(1999)));
        assert_eq!(Money::parse("$1,234.56"), Ok(Money(123_456)));
        assert_eq!(Money::parse("  $20.00 "), Ok(Money(2000)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Money::parse(""), Err(MoneyParseError::Empty));
        assert_eq!(Money::parse("$"), Err(MoneyParseError::Empty));
        assert!(matches!(Money::parse("abc"), Err(MoneyParseError::Invalid(_))));
        assert!(matches!(
            Money::parse("19.999"),
            Err(MoneyParseError::Invalid(_))
        ));
        assert!(matches!(
            Money::parse("-5.00"),
            Err(MoneyParseError::Negative(_))
        ));
    }

    #[test]
    fn test_ordering() {
        assert!(Money(1999) < Money(2000));
        assert!(Money::parse("$19.99").unwrap() < Money::from_parts(20, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money(1999).to_string(), "$19.99");
        assert_eq!(Money(2000).to_string(), "$20.00");
        assert_eq!(Money(5).to_string(), "$0.05");
    }

    #[test]
    fn test_f64_conversion() {
        assert_eq!(Money::from_f64(20.0), Money(2000));
        assert_eq!(Money::from_f64(19.99), Money(1999));
        assert_eq!(Money(1999).to_f64(), 19.99);
    }
}
