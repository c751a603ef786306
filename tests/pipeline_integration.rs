//! End-to-end pipeline tests: file on disk → parse → conflict check →
//! submission → reconciliation → success file.

use std::io::Write;

use chrono::Datelike;
use tempfile::TempDir;

use capture_scheduler::directory::{LocalSite, RecorderCache};
use capture_scheduler::models::ValidityCode;
use capture_scheduler::parser::{parse_file, ParseOptions};
use capture_scheduler::report;
use capture_scheduler::scheduler::{schedule_recordings, split_results};

const LEGACY_HEADER: &str =
    "sessionName,recorderName,recordingDate,startTime,endTime,presenterName,folderName";

fn write_schedule_file(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("schedule.csv");
    let mut file = std::fs::File::create(&path).expect("create schedule file");
    file.write_all(content.as_bytes()).expect("write schedule");
    path
}

fn populated_site() -> LocalSite {
    let site = LocalSite::new();
    site.add_recorder("ICC 115");
    site.add_recorder("WGR 201");
    site.add_folder("MATH-101");
    site.add_folder("HIST-007");
    site
}

#[tokio::test]
async fn legacy_file_flows_from_disk_to_success_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule_file(
        &dir,
        &format!(
            "{LEGACY_HEADER}\n\
             Calculus I,ICC 115,8/25/2031,9:00,9:50,Euler,MATH-101\n\
             World History,WGR 201,8/25/2031,9:00,10:15,Herodotus,HIST-007\n"
        ),
    );
    let site = populated_site();
    let mut cache = RecorderCache::new();

    let output = parse_file(&path, &site, &site, &mut cache, &ParseOptions::default())
        .await
        .expect("parse should succeed");
    assert!(output.errors.is_empty(), "errors: {:?}", output.errors);
    assert_eq!(output.accepted.len(), 2);

    let results = schedule_recordings(&site, output.accepted, false, None).await;
    let results = split_results(results);
    assert_eq!(results.successes.len(), 2);
    assert!(results.conflicts.is_empty());

    let success_path = report::write_success_file(
        &site,
        &results.successes,
        dir.path(),
        "20310801_090000",
    )
    .await
    .expect("write success file");
    let content = std::fs::read_to_string(success_path).unwrap();
    // Header plus one row per scheduled session.
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("Calculus I"));
    assert!(content.contains("World History"));
}

#[tokio::test]
async fn bad_rows_are_reported_and_kept_out_of_submission() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule_file(
        &dir,
        &format!(
            "{LEGACY_HEADER}\n\
             short,row\n\
             Calculus I,ICC 115,8/25/2031,10:00,11:00,Euler,MATH-101\n\
             Shadowed,ICC 115,8/25/2031,10:30,11:30,Euler,MATH-101\n\
             Ghost,NO SUCH ROOM,8/25/2031,13:00,14:00,Nobody,MATH-101\n"
        ),
    );
    let site = populated_site();
    let mut cache = RecorderCache::new();

    let output = parse_file(&path, &site, &site, &mut cache, &ParseOptions::default())
        .await
        .expect("parse should succeed");

    assert_eq!(output.errors.get(&2), Some(&ValidityCode::ParseError));
    assert_eq!(output.errors.get(&4), Some(&ValidityCode::TimeConflict));
    assert_eq!(output.errors.get(&5), Some(&ValidityCode::BadRecorderId));
    assert_eq!(output.accepted.len(), 1);
    assert_eq!(output.accepted[0].session_name, "Calculus I");

    let results = schedule_recordings(&site, output.accepted, false, None).await;
    let results = split_results(results);
    assert_eq!(results.successes.len(), 1);
    assert!(results.conflicts.is_empty());

    let mut rendered = Vec::new();
    report::write_parse_report(&mut rendered, &output.errors).unwrap();
    let text = String::from_utf8(rendered).unwrap();
    assert!(text.contains("3 conflicts found."));
}

#[tokio::test]
async fn banner_term_flows_through_recurrence_registration() {
    let dir = TempDir::new().unwrap();
    let header = "Seats,Enr,Building,Room,Title,Instructor,Begin Time,End Time,\
                  Meeting Days,Meeting Type,Course ID,Section";
    let path = write_schedule_file(
        &dir,
        &format!("{header}\n40,35,ICC,115,Calculus I,Euler,0900,0950,MWF,Lecture,MATH101,01\n"),
    );
    let site = LocalSite::new();
    site.add_recorder("ICC 115");
    site.add_folder("MATH-101-01.F2031");

    let options = ParseOptions {
        term_start: chrono::NaiveDate::from_ymd_opt(2031, 8, 25),
        term_end: chrono::NaiveDate::from_ymd_opt(2031, 12, 12),
        term: Some("F2031".to_string()),
        ..ParseOptions::default()
    };
    let mut cache = RecorderCache::new();
    let output = parse_file(&path, &site, &site, &mut cache, &options)
        .await
        .expect("parse should succeed");
    assert!(output.errors.is_empty(), "errors: {:?}", output.errors);
    assert_eq!(output.accepted.len(), 1);

    let results = schedule_recordings(&site, output.accepted, false, None).await;
    let results = split_results(results);
    assert_eq!(results.successes.len(), 1);
    assert!(results.conflicts.is_empty());

    let (days, end_date) = site
        .recurrence_for(results.successes[0])
        .expect("the series must be registered");
    assert_eq!(days.len(), 3);
    assert_eq!(end_date.year(), 2031);
}

#[tokio::test]
async fn unknown_format_yields_only_the_global_error() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule_file(&dir, "these,are,not\nschedule,rows,either\n");
    let site = populated_site();
    let mut cache = RecorderCache::new();

    let output = parse_file(&path, &site, &site, &mut cache, &ParseOptions::default())
        .await
        .expect("parse should succeed");

    assert!(output.unsupported_format());
    assert!(output.accepted.is_empty());
    assert!(output.conflicts.is_empty());

    let mut rendered = Vec::new();
    report::write_parse_report(&mut rendered, &output.errors).unwrap();
    let text = String::from_utf8(rendered).unwrap();
    assert!(text.contains("Filetype not supported."));
}
