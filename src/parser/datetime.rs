//! Date/time field combination.
//!
//! Source files carry dates and wall-clock times in separate columns, in
//! local time. Helpers here combine them into absolute UTC instants; an
//! absent or unparsable field yields `None` (the "unset" sentinel), never
//! the current time.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

/// Date layouts accepted across the supported formats.
const DATE_LAYOUTS: &[&str] = &["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];

/// Clock layouts accepted when a format does not pin one down.
const TIME_LAYOUTS: &[&str] = &["%H:%M", "%I:%M %p", "%H:%M:%S", "%I:%M:%S %p"];

/// 24-hour clock without a separator, left-zero-padded ("0905", "1330").
pub const COMPACT_24H: &str = "%H%M";

pub fn parse_local_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(date, layout).ok())
}

fn parse_clock(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    TIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveTime::parse_from_str(time, layout).ok())
}

fn local_to_utc(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Combine a date field and a free-form time field into a UTC instant.
pub fn parse_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    local_to_utc(parse_local_date(date)?, parse_clock(time)?)
}

/// Combine a date field and a time field in a fixed clock layout.
pub fn parse_date_time_with(date: &str, time: &str, layout: &str) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time.trim(), layout).ok()?;
    local_to_utc(parse_local_date(date)?, time)
}

/// Put a time-of-day in a fixed clock layout onto the local calendar day of
/// `base`. `None` base stays unset.
pub fn combine_time(
    base: Option<NaiveDate>,
    time: &str,
    layout: &str,
) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time.trim(), layout).ok()?;
    local_to_utc(base?, time)
}

/// Span between two instants computed from their local times-of-day on the
/// same calendar day.
///
/// Subtracting the UTC instants directly can cross a day boundary after the
/// local-to-UTC round trip and come out negative; the local time-of-day
/// difference cannot.
pub fn same_day_span(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeDelta {
    end.with_timezone(&Local).time() - start.with_timezone(&Local).time()
}

/// Render an instant the way session names embed it.
pub fn local_display(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%-m/%-d/%Y %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn combines_date_and_time_fields() {
        let instant = parse_date_time("8/25/2031", "9:05").unwrap();
        let local = instant.with_timezone(&Local);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2031, 8, 25).unwrap());
        assert_eq!((local.hour(), local.minute()), (9, 5));
    }

    #[test]
    fn accepts_twelve_hour_clock() {
        let instant = parse_date_time("2031-08-25", "1:30 PM").unwrap();
        assert_eq!(instant.with_timezone(&Local).hour(), 13);
    }

    #[test]
    fn unparsable_fields_stay_unset() {
        assert_eq!(parse_date_time("", "9:05"), None);
        assert_eq!(parse_date_time("8/25/2031", ""), None);
        assert_eq!(parse_date_time("yesterday", "9:05"), None);
        assert_eq!(parse_date_time("8/25/2031", "late"), None);
    }

    #[test]
    fn compact_clock_layout() {
        let instant = parse_date_time_with("8/25/2031", "0905", COMPACT_24H).unwrap();
        let local = instant.with_timezone(&Local);
        assert_eq!((local.hour(), local.minute()), (9, 5));
        assert_eq!(parse_date_time_with("8/25/2031", "905", COMPACT_24H), None);
    }

    #[test]
    fn combine_time_needs_a_base_date() {
        assert_eq!(combine_time(None, "0905", COMPACT_24H), None);
        let base = NaiveDate::from_ymd_opt(2031, 8, 25).unwrap();
        assert!(combine_time(Some(base), "0905", COMPACT_24H).is_some());
    }

    #[test]
    fn same_day_span_is_the_local_clock_difference() {
        let start = parse_date_time("8/25/2031", "10:00").unwrap();
        let end = parse_date_time("8/25/2031", "11:15").unwrap();
        assert_eq!(same_day_span(start, end), TimeDelta::minutes(75));
        // Reversed order comes out negative and fails validation downstream.
        assert_eq!(same_day_span(end, start), TimeDelta::minutes(-75));
    }
}
