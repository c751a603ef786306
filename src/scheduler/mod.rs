//! Submission of accepted recordings and reconciliation of the outcomes.

pub mod conflicts;

pub use conflicts::check_conflicts;

use tracing::{info, warn};
use uuid::Uuid;

use crate::directory::{ScheduleOutcome, ScheduledSessionInfo, SchedulingService, SessionRequest};
use crate::models::{align_to_cadence, Recording};

/// Optional per-entry progress observer. Called with (1-based index, total)
/// after each submission begins; purely observational and never required
/// for the pipeline to advance.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Submit recordings one at a time and collect each outcome.
///
/// A recurring recording has its start date aligned onto its cadence
/// immediately before submission (the one sanctioned late mutation), and a
/// successful first occurrence is followed by a second call registering the
/// weekly series. The outcome of that second call is recorded under a
/// synthetic copy of the entry so a failure there does not retroactively
/// invalidate the first occurrence's success.
///
/// A failed remote call is recorded as a conflict outcome with no
/// conflicting sessions attached; submission always continues with the next
/// entry.
pub async fn schedule_recordings(
    service: &dyn SchedulingService,
    schedule: Vec<Recording>,
    broadcast_override: bool,
    progress: Option<ProgressFn<'_>>,
) -> Vec<(Recording, ScheduleOutcome)> {
    let total = schedule.len();
    let mut results: Vec<(Recording, ScheduleOutcome)> = Vec::with_capacity(total);

    for (index, mut recording) in schedule.into_iter().enumerate() {
        match progress {
            Some(report) => report(index + 1, total),
            None => info!("scheduling recording {}/{}", index + 1, total),
        }

        let outcome = submit_one(service, &mut recording, broadcast_override).await;
        let series = match (&outcome, &recording.recurrence) {
            (ScheduleOutcome::Created { session_ids }, Some(recurrence)) => {
                let synthetic = recording.clone();
                match (session_ids.first(), recurrence.end_date) {
                    (Some(&session_id), Some(end_date)) => {
                        let days = recurrence.cadence.to_weekday_array();
                        let series_outcome = service
                            .schedule_recurring(session_id, &days, end_date)
                            .await
                            .unwrap_or_else(|err| {
                                warn!(%session_id, error = %err, "recurrence registration failed");
                                ScheduleOutcome::Conflicted { existing: vec![] }
                            });
                        Some((synthetic, series_outcome))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        results.push((recording, outcome));
        if let Some(entry) = series {
            results.push(entry);
        }
    }
    results
}

async fn submit_one(
    service: &dyn SchedulingService,
    recording: &mut Recording,
    broadcast_override: bool,
) -> ScheduleOutcome {
    let failed = ScheduleOutcome::Conflicted { existing: vec![] };

    if let Some(recurrence) = &recording.recurrence {
        if let Some(start) = recording.start {
            match align_to_cadence(start, recurrence.cadence) {
                Ok(aligned) => recording.start = Some(aligned),
                Err(err) => {
                    // Only reachable when an invalid entry bypassed
                    // validation; record it as a failed submission.
                    warn!(session = %recording.session_name, error = %err, "cadence contract violated");
                    return failed;
                }
            }
        }
    }

    let (Some(start), Some(end)) = (recording.start, recording.end()) else {
        return failed;
    };
    let request = SessionRequest {
        session_name: recording.session_name.clone(),
        folder_id: recording.folder_id,
        is_broadcast: recording.is_broadcast || broadcast_override,
        start,
        end,
        recorder_id: recording.recorder_id,
    };
    match service.schedule_recording(&request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(session = %recording.session_name, error = %err, "submission failed");
            failed
        }
    }
}

/// Outcomes of one scheduling run, split for reporting.
#[derive(Debug, Default)]
pub struct ScheduleResults {
    /// Session ids the site created.
    pub successes: Vec<Uuid>,
    /// Entries the site refused, with the pre-existing sessions they
    /// collided with (empty when the submission itself failed).
    pub conflicts: Vec<(Recording, Vec<ScheduledSessionInfo>)>,
}

/// Split raw submission outcomes into successes and conflicts.
pub fn split_results(results: Vec<(Recording, ScheduleOutcome)>) -> ScheduleResults {
    let mut split = ScheduleResults::default();
    for (recording, outcome) in results {
        match outcome {
            ScheduleOutcome::Created { session_ids } => {
                split.successes.extend(session_ids);
            }
            ScheduleOutcome::Conflicted { existing } => {
                split.conflicts.push((recording, existing));
            }
        }
    }
    split
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
