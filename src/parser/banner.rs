//! Row rules for Banner registrar exports.
//!
//! Rows are recurring course meetings. The term window (start and end date)
//! is not in the file; it arrives as arguments and carries the begin/end
//! clock times from the row.

use chrono::NaiveDate;
use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

use super::datetime::{combine_time, same_day_span, COMPACT_24H};
use super::field;
use crate::models::{Recording, Recurrence, Weekdays};

/// Room numbers may carry a single letter prefix ("B213"); only the digits
/// name the room the recorder is installed in.
static ROOM_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]?(?P<number>[0-9]+)").expect("room pattern"));

/// Course IDs pack an alphabetic department code against a numeric course
/// number ("MATH101").
static COURSE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<department>[A-Za-z]+?)(?P<number>[0-9]+)").expect("course pattern")
});

/// Known building abbreviations that differ from the recorder naming.
fn expand_building(building: &str) -> &str {
    match building {
        "LAW" => "LAW MCD",
        "HTNG" => "LAW HOTUNG",
        other => other,
    }
}

pub(super) fn recorder_name_from(building: &str, room: &str) -> String {
    let number = ROOM_NUMBER
        .captures(room)
        .and_then(|c| c.name("number"))
        .map(|m| m.as_str())
        .unwrap_or("");
    format!("{} {}", expand_building(building), number)
}

pub(super) fn split_course_id(course_id: &str) -> (String, String) {
    match COURSE_ID.captures(course_id) {
        Some(captures) => (
            captures
                .name("department")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            captures
                .name("number")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}

pub(super) fn normalize(
    record: &StringRecord,
    term_start: Option<NaiveDate>,
    term_end: Option<NaiveDate>,
    term: &str,
) -> Recording {
    let start = combine_time(term_start, field(record, 6), COMPACT_24H);
    let end_date = combine_time(term_end, field(record, 7), COMPACT_24H);
    // Clock-time difference, deliberately ignoring the differing base dates.
    let duration = match (start, end_date) {
        (Some(start), Some(end)) => same_day_span(start, end),
        _ => chrono::TimeDelta::zero(),
    };

    let (department, course_number) = split_course_id(field(record, 10));
    let folder_name = format!(
        "{}-{}-{}.{}",
        department,
        course_number,
        field(record, 11),
        term
    );

    Recording {
        recorder_name: recorder_name_from(field(record, 2), field(record, 3)),
        session_name: field(record, 4).to_string(),
        presenter: field(record, 5).to_string(),
        start,
        duration,
        folder_name,
        recurrence: Some(Recurrence {
            end_date,
            cadence: Weekdays::from_day_codes(field(record, 8)),
        }),
        ..Recording::default()
    }
}
