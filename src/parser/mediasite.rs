//! Row rules for Mediasite migration exports.
//!
//! Rows are one-time recordings. The session name is composed from the room
//! alias, an optional alternate title, and the local start time. All rows
//! file into one configured folder when the run provides one.

use csv::StringRecord;
use uuid::Uuid;

use super::datetime::{local_display, parse_date_time};
use super::field;
use crate::models::Recording;

fn start_of(record: &StringRecord) -> Option<chrono::DateTime<chrono::Utc>> {
    let date = field(record, 3);
    let time = field(record, 4);
    if date.is_empty() || time.is_empty() {
        return None;
    }
    parse_date_time(date, time)
}

pub(super) fn normalize(record: &StringRecord, fixed_folder_id: Option<Uuid>) -> Recording {
    let start = start_of(record);

    let date = field(record, 3);
    let end = parse_date_time(date, field(record, 5));
    let duration = match (start, end) {
        (Some(start), Some(end)) => end - start,
        _ => chrono::TimeDelta::zero(),
    };

    let alias = field(record, 7);
    let alternate = field(record, 8).trim();
    let mut session_name = if alternate.is_empty() {
        alias.to_string()
    } else {
        format!("{} ({})", alias, alternate)
    };
    if let Some(start) = start {
        session_name = format!("{} at {}", session_name, local_display(start));
    }

    Recording {
        session_name,
        recorder_name: field(record, 6).to_string(),
        start,
        duration,
        presenter: String::new(),
        folder_id: fixed_folder_id.unwrap_or_else(Uuid::nil),
        ..Recording::default()
    }
}
