//! Date arithmetic for the club calendar.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::DanceDate;

/// Whole days from `reference` to `date`; negative when `date` is in the past.
pub fn days_until(reference: NaiveDate, date: NaiveDate) -> i64 {
    (date - reference).num_days()
}

/// True when `date` is the fifth occurrence of its weekday in its month.
pub fn is_fifth_occurrence(date: NaiveDate) -> bool {
    date.day() > 28
}

/// Every club night on `weekday` between `from` and `to`, inclusive.
/// The fifth occurrence of the weekday in a month is a board night.
pub fn dance_nights(from: NaiveDate, to: NaiveDate, weekday: Weekday) -> Vec<DanceDate> {
    if to < from {
        return Vec::new();
    }
    let offset = (7 + weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;
    let mut nights = Vec::new();
    let mut date = from + Duration::days(offset);
    while date <= to {
        if is_fifth_occurrence(date) {
            nights.push(DanceDate::fifth_wednesday(date));
        } else {
            nights.push(DanceDate::normal(date));
        }
        date += Duration::days(7);
    }
    nights
}

/// Parses YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

pub fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("Invalid weekday '{}'", s))
}
