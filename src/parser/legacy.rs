//! Row rules for the legacy in-house schedule format.
//!
//! One row per one-time recording: session name, recorder name, recording
//! date, start/end times, presenter, and folder name in that order.

use csv::StringRecord;

use super::datetime::{local_display, parse_date_time};
use super::field;
use crate::models::Recording;

pub(super) fn normalize(record: &StringRecord) -> Recording {
    let date = field(record, 2);
    let start = parse_date_time(date, field(record, 3));

    let end = parse_date_time(date, field(record, 4));
    let duration = match (start, end) {
        (Some(start), Some(end)) => end - start,
        _ => chrono::TimeDelta::zero(),
    };

    // An omitted session name falls back to the recording's start time,
    // tagged with the presenter when one is given. An unset start yields no
    // fallback at all and the entry fails validation as BadSessionName.
    let mut session_name = field(record, 0).to_string();
    if session_name.is_empty() {
        if let Some(start) = start {
            session_name = local_display(start);
            let presenter = field(record, 5);
            if !presenter.is_empty() {
                session_name = format!("{} By {}", session_name, presenter);
            }
        }
    }

    Recording {
        session_name,
        recorder_name: field(record, 1).to_string(),
        start,
        duration,
        presenter: field(record, 5).to_string(),
        folder_name: field(record, 6).to_string(),
        ..Recording::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn maps_all_fields() {
        let rec = normalize(&row(&[
            "Calculus I",
            "ICC 115",
            "8/25/2031",
            "9:00",
            "9:50",
            "Euler",
            "MATH-101",
        ]));
        assert_eq!(rec.session_name, "Calculus I");
        assert_eq!(rec.recorder_name, "ICC 115");
        assert_eq!(rec.presenter, "Euler");
        assert_eq!(rec.folder_name, "MATH-101");
        assert!(rec.start.is_some());
        assert_eq!(rec.duration, TimeDelta::minutes(50));
        assert!(rec.recurrence.is_none());
        assert!(rec.recorder_id.is_nil());
        assert!(rec.folder_id.is_nil());
    }

    #[test]
    fn missing_session_name_defaults_to_start_time() {
        let rec = normalize(&row(&[
            "",
            "ICC 115",
            "8/25/2031",
            "9:00",
            "9:50",
            "Euler",
            "MATH-101",
        ]));
        assert!(rec.session_name.contains("By Euler"));
        assert!(rec.session_name.contains("2031"));
    }

    #[test]
    fn unparsable_start_leaves_name_empty_and_start_unset() {
        let rec = normalize(&row(&[
            "", "ICC 115", "someday", "9:00", "9:50", "Euler", "MATH-101",
        ]));
        assert_eq!(rec.start, None);
        assert!(rec.session_name.is_empty());
        assert_eq!(rec.duration, TimeDelta::zero());
    }

    #[test]
    fn missing_end_time_means_zero_duration() {
        let rec = normalize(&row(&[
            "Calculus I",
            "ICC 115",
            "8/25/2031",
            "9:00",
            "",
            "Euler",
            "MATH-101",
        ]));
        assert!(rec.start.is_some());
        assert_eq!(rec.duration, TimeDelta::zero());
    }
}
