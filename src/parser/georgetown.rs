//! Row rules for Georgetown classroom-capture exports.
//!
//! Rows are recurring course meetings with their own term dates, compact
//! 24-hour clock times, and a recording option column that selects an
//! alternate folder naming.

use csv::StringRecord;

use super::banner::split_course_id;
use super::datetime::{parse_date_time_with, same_day_span, COMPACT_24H};
use super::field;
use crate::models::{Recording, Recurrence, Weekdays};

const OPTION_2: &str = "Option 2";
const OPTION_2_MODIFIER: &str = "-LA";

/// Left-pad a section number with zeros: two characters for short sections,
/// five for long ones, three-character sections as-is.
fn pad_section(section: &str) -> String {
    match section.len() {
        0..=2 => format!("{:0>2}", section),
        3 => section.to_string(),
        _ => format!("{:0>5}", section),
    }
}

/// Clock fields may drop the leading zero ("905" for 9:05).
fn pad_clock(time: &str) -> String {
    format!("{:0>4}", time.trim())
}

pub(super) fn normalize(record: &StringRecord, term: &str) -> Recording {
    let start = parse_date_time_with(
        field(record, 0),
        &pad_clock(field(record, 7)),
        COMPACT_24H,
    );
    let end_date = parse_date_time_with(
        field(record, 1),
        &pad_clock(field(record, 8)),
        COMPACT_24H,
    );
    let duration = match (start, end_date) {
        (Some(start), Some(end)) => same_day_span(start, end),
        _ => chrono::TimeDelta::zero(),
    };

    let (department, course_number) = split_course_id(field(record, 10).trim());
    let modifier = if field(record, 12).eq_ignore_ascii_case(OPTION_2) {
        OPTION_2_MODIFIER
    } else {
        ""
    };
    let folder_name = format!(
        "{}-{}-{}{}.{}",
        department,
        course_number,
        pad_section(field(record, 11).trim()),
        modifier,
        term
    );

    Recording {
        recorder_name: format!(
            "{} {}",
            field(record, 2).trim(),
            field(record, 3).trim()
        ),
        session_name: field(record, 5).to_string(),
        presenter: field(record, 6).to_string(),
        start,
        duration,
        folder_name,
        recurrence: Some(Recurrence {
            end_date,
            cadence: Weekdays::from_day_codes(field(record, 9)),
        }),
        ..Recording::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Weekday};

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    fn sample() -> Vec<&'static str> {
        vec![
            "8/27/2031",
            "12/10/2031",
            "ICC",
            "115",
            "ICC 115",
            "Intro to Proofs",
            "Gauss",
            "905",
            "1020",
            "TR",
            "MATH200",
            "3",
            "Option 1",
        ]
    }

    #[test]
    fn maps_course_row() {
        let rec = normalize(&row(&sample()), "F2031");
        assert_eq!(rec.recorder_name, "ICC 115");
        assert_eq!(rec.session_name, "Intro to Proofs");
        assert_eq!(rec.presenter, "Gauss");
        assert_eq!(rec.folder_name, "MATH-200-03.F2031");
        assert_eq!(rec.duration, TimeDelta::minutes(75));
        assert!(rec.start.is_some());

        let recurrence = rec.recurrence.expect("georgetown rows recur");
        assert!(recurrence.cadence.contains(Weekday::Tue));
        assert!(recurrence.cadence.contains(Weekday::Thu));
        assert!(recurrence.end_date.is_some());
    }

    #[test]
    fn short_clock_times_are_zero_padded() {
        let mut fields = sample();
        fields[7] = "905";
        fields[8] = "955";
        let rec = normalize(&row(&fields), "F2031");
        assert_eq!(rec.duration, TimeDelta::minutes(50));
    }

    #[test]
    fn section_padding_widths() {
        assert_eq!(pad_section("1"), "01");
        assert_eq!(pad_section("12"), "12");
        assert_eq!(pad_section("123"), "123");
        assert_eq!(pad_section("1234"), "01234");
        assert_eq!(pad_section("12345"), "12345");
    }

    #[test]
    fn option_two_appends_folder_modifier() {
        let mut fields = sample();
        fields[12] = "option 2";
        let rec = normalize(&row(&fields), "F2031");
        assert_eq!(rec.folder_name, "MATH-200-03-LA.F2031");
    }

    #[test]
    fn unparsable_dates_leave_instants_unset() {
        let mut fields = sample();
        fields[0] = "TBD";
        let rec = normalize(&row(&fields), "F2031");
        assert_eq!(rec.start, None);
        assert_eq!(rec.duration, TimeDelta::zero());
    }
}
