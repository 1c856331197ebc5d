//! Travel-date enumeration.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Default qualifying-date predicate: Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Collect the next `count` qualifying travel dates.
///
/// Starts at the day after `from` and advances one calendar day at a
/// time, keeping dates the predicate accepts. Deterministic and
/// stateless; the predicate must accept infinitely many future dates.
pub fn next_qualifying_dates<F>(from: NaiveDate, count: usize, qualifies: F) -> Vec<NaiveDate>
where
    F: Fn(NaiveDate) -> bool,
{
    let mut dates = Vec::with_capacity(count);
    let mut current = from;
    while dates.len() < count {
        current += Duration::days(1);
        if qualifies(current) {
            dates.push(current);
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_weekday_predicate() {
        assert!(is_weekday(ymd(2024, 6, 7))); // Friday
        assert!(!is_weekday(ymd(2024, 6, 8))); // Saturday
        assert!(!is_weekday(ymd(2024, 6, 9))); // Sunday
        assert!(is_weekday(ymd(2024, 6, 10))); // Monday
    }

    #[test]
    fn test_from_friday_skips_weekend() {
        // 2024-06-07 is a Friday; the next five weekdays are the
        // following Monday through Friday.
        let dates = next_qualifying_dates(ymd(2024, 6, 7), 5, is_weekday);
        assert_eq!(
            dates,
            vec![
                ymd(2024, 6, 10),
                ymd(2024, 6, 11),
                ymd(2024, 6, 12),
                ymd(2024, 6, 13),
                ymd(2024, 6, 14),
            ]
        );
    }

    #[test]
    fn test_from_wednesday_straddles_weekend() {
        let dates = next_qualifying_dates(ymd(2024, 6, 5), 5, is_weekday);
        assert_eq!(
            dates,
            vec![
                ymd(2024, 6, 6),
                ymd(2024, 6, 7),
                ymd(2024, 6, 10),
                ymd(2024, 6, 11),
                ymd(2024, 6, 12),
            ]
        );
    }

    #[test]
    fn test_starts_tomorrow_not_today() {
        // A qualifying `from` date is never included itself.
        let dates = next_qualifying_dates(ymd(2024, 6, 10), 1, is_weekday);
        assert_eq!(dates, vec![ymd(2024, 6, 11)]);
    }

    #[test]
    fn test_custom_predicate() {
        let mondays = next_qualifying_dates(ymd(2024, 6, 7), 2, |d| {
            d.weekday() == Weekday::Mon
        });
        assert_eq!(mondays, vec![ymd(2024, 6, 10), ymd(2024, 6, 17)]);
    }

    #[test]
    fn test_zero_count() {
        assert!(next_qualifying_dates(ymd(2024, 6, 7), 0, is_weekday).is_empty());
    }
}
