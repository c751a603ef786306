use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Datelike, Local, TimeDelta, TimeZone, Utc, Weekday};
use uuid::Uuid;

use super::*;
use crate::directory::{LocalSite, ScheduleOutcome};
use crate::models::{Recording, Recurrence, Weekdays};

fn local_noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, 12, 0, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn one_time(recorder_id: Uuid, folder_id: Uuid, start: DateTime<Utc>) -> Recording {
    Recording {
        recorder_id,
        recorder_name: "ICC 115".into(),
        folder_id,
        folder_name: "MATH-101".into(),
        session_name: "Calculus I".into(),
        start: Some(start),
        duration: TimeDelta::minutes(50),
        presenter: "Euler".into(),
        ..Recording::default()
    }
}

fn recurring(recorder_id: Uuid, folder_id: Uuid, start: DateTime<Utc>, codes: &str) -> Recording {
    let mut rec = one_time(recorder_id, folder_id, start);
    rec.recurrence = Some(Recurrence {
        end_date: Some(start + TimeDelta::days(100)),
        cadence: Weekdays::from_day_codes(codes),
    });
    rec
}

#[tokio::test]
async fn one_time_recording_is_created() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let results = schedule_recordings(
        &site,
        vec![one_time(recorder, folder, start)],
        false,
        None,
    )
    .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].1, ScheduleOutcome::Created { .. }));
    assert_eq!(site.session_count(), 1);
}

#[tokio::test]
async fn overlapping_submission_reports_the_existing_session() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let first = one_time(recorder, folder, start);
    let mut second = one_time(recorder, folder, start + TimeDelta::minutes(30));
    second.session_name = "Overlapping".into();

    let results = schedule_recordings(&site, vec![first, second], false, None).await;
    let split = split_results(results);

    assert_eq!(split.successes.len(), 1);
    assert_eq!(split.conflicts.len(), 1);
    let (conflicted, existing) = &split.conflicts[0];
    assert_eq!(conflicted.session_name, "Overlapping");
    assert_eq!(existing.len(), 1);
    assert_eq!(existing[0].session_name, "Calculus I");
}

#[tokio::test]
async fn recurring_start_is_aligned_onto_the_cadence() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    // 2031-08-28 is a Thursday; a Monday-only cadence must push the start
    // to the following Monday.
    let thursday = local_noon(2031, 8, 28);
    assert_eq!(thursday.with_timezone(&Local).weekday(), Weekday::Thu);

    let results = schedule_recordings(
        &site,
        vec![recurring(recorder, folder, thursday, "M")],
        false,
        None,
    )
    .await;

    let (submitted, outcome) = &results[0];
    assert!(matches!(outcome, ScheduleOutcome::Created { .. }));
    let aligned = submitted.start.unwrap();
    assert_eq!(aligned, thursday + TimeDelta::days(4));
    assert_eq!(aligned.with_timezone(&Local).weekday(), Weekday::Mon);
}

#[tokio::test]
async fn recurring_success_registers_the_series() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let results = schedule_recordings(
        &site,
        vec![recurring(recorder, folder, start, "MWF")],
        false,
        None,
    )
    .await;

    // First occurrence plus the synthetic series entry.
    assert_eq!(results.len(), 2);
    let split = split_results(results);
    assert_eq!(split.successes.len(), 1);
    assert!(split.conflicts.is_empty());

    let (days, _end) = site
        .recurrence_for(split.successes[0])
        .expect("series registered for the created session");
    assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
}

#[tokio::test]
async fn series_conflict_does_not_invalidate_the_first_occurrence() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    site.set_conflict_on_recurring(true);
    let start = local_noon(2031, 8, 25);

    let results = schedule_recordings(
        &site,
        vec![recurring(recorder, folder, start, "MWF")],
        false,
        None,
    )
    .await;
    let split = split_results(results);

    // The occurrence's success survives; the conflict lands on the
    // synthetic copy with no existing sessions attached.
    assert_eq!(split.successes.len(), 1);
    assert_eq!(split.conflicts.len(), 1);
    assert!(split.conflicts[0].1.is_empty());
}

#[tokio::test]
async fn all_successes_reconcile_to_an_empty_conflict_map() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let schedule = vec![
        one_time(recorder, folder, start),
        one_time(recorder, folder, start + TimeDelta::hours(2)),
        one_time(recorder, folder, start + TimeDelta::hours(4)),
    ];
    let results = schedule_recordings(&site, schedule, false, None).await;
    let created: usize = results
        .iter()
        .map(|(_, outcome)| match outcome {
            ScheduleOutcome::Created { session_ids } => session_ids.len(),
            ScheduleOutcome::Conflicted { .. } => 0,
        })
        .sum();
    let split = split_results(results);

    assert_eq!(split.successes.len(), created);
    assert!(split.conflicts.is_empty());
}

#[tokio::test]
async fn broadcast_override_applies_at_submission_time() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let recording = one_time(recorder, folder, start);
    assert!(!recording.is_broadcast);
    let results = schedule_recordings(&site, vec![recording], true, None).await;

    // The entry itself is left untouched by the override.
    assert!(!results[0].0.is_broadcast);
}

#[tokio::test]
async fn progress_is_reported_once_per_entry() {
    let site = LocalSite::new();
    let recorder = site.add_recorder("ICC 115");
    let folder = site.add_folder("MATH-101");
    let start = local_noon(2031, 8, 25);

    let calls = AtomicUsize::new(0);
    let observer = |_done: usize, _total: usize| {
        calls.fetch_add(1, Ordering::SeqCst);
    };
    let schedule = vec![
        one_time(recorder, folder, start),
        one_time(recorder, folder, start + TimeDelta::hours(2)),
    ];
    schedule_recordings(&site, schedule, false, Some(&observer)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
