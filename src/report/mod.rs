//! Human-readable run reports and the success output file.
//!
//! Reports write to any `io::Write` so the binary can tee the same content
//! to the console and a timestamped log file.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use uuid::Uuid;

use crate::directory::{ScheduledSessionInfo, SchedulingService};
use crate::models::{Recording, ScheduledSession, ValidityCode};
use crate::parser::GLOBAL_PARSE_ERROR_LINE;
use crate::scheduler::ScheduleResults;

const RULE: &str = "---------------------------------------------------------";

fn explain(code: ValidityCode) -> Option<&'static str> {
    match code {
        ValidityCode::ParseError => Some("Line could not be parsed."),
        ValidityCode::TimeConflict => {
            Some("This line has a time conflict with another recording.")
        }
        ValidityCode::BadRecorderId => {
            Some("Recorder name provided or accessible recorder could not be found.")
        }
        ValidityCode::BadFolderId => {
            Some("Folder name provided or valid accessible folder could not be found.")
        }
        ValidityCode::BadSessionId => Some("Session ID provided was invalid."),
        ValidityCode::BadSessionName => Some("Session name provided was invalid."),
        ValidityCode::BadPresenter => Some("Presenter provided was invalid."),
        ValidityCode::BadStartDate => Some("Start date provided was invalid."),
        ValidityCode::BadDuration => Some("Duration provided was invalid."),
        ValidityCode::BadEndDate => Some("End date provided was invalid."),
        ValidityCode::BadCadence => Some("Cadence provided was invalid."),
        ValidityCode::Valid => None,
    }
}

fn local_time(instant: chrono::DateTime<chrono::Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Print each parsed recording's fields.
pub fn write_schedule<W: Write>(writer: &mut W, schedule: &[Recording]) -> io::Result<()> {
    for recording in schedule {
        writeln!(writer, "Session Name:   {}", recording.session_name)?;
        writeln!(writer, "Recorder ID:    {}", recording.recorder_id)?;
        writeln!(writer, "Recorder Name:  {}", recording.recorder_name)?;
        writeln!(writer, "Folder ID:      {}", recording.folder_id)?;
        writeln!(writer, "Folder Name:    {}", recording.folder_name)?;
        match recording.start {
            Some(start) => writeln!(writer, "Start Date:     {}", local_time(start))?,
            None => writeln!(writer, "Start Date:     (unset)")?,
        }
        writeln!(writer, "Duration:       {} min", recording.duration.num_minutes())?;
        writeln!(writer, "Presenter:      {}", recording.presenter)?;
        writeln!(writer, "Broadcast:      {}", recording.is_broadcast)?;
        writeln!(writer, "{RULE}")?;
    }
    Ok(())
}

/// Report every per-line failure found while parsing and conflict-checking
/// the file, or a success note when there were none.
pub fn write_parse_report<W: Write>(
    writer: &mut W,
    errors: &BTreeMap<usize, ValidityCode>,
) -> io::Result<()> {
    let plural = if errors.len() == 1 { "" } else { "s" };
    writeln!(writer, "{} conflict{} found.", errors.len(), plural)?;
    writeln!(writer, "{RULE}")?;
    for (&line, &code) in errors {
        writeln!(writer, "CSV Line Number:  {}", line)?;
        writeln!(writer, "Validity Status:  {}", code)?;
        if let Some(explanation) = explain(code) {
            writeln!(writer, "{explanation}")?;
        }
        if line == GLOBAL_PARSE_ERROR_LINE {
            writeln!(writer, "Filetype not supported.")?;
        }
        writeln!(writer, "{RULE}")?;
    }
    if errors.is_empty() {
        writeln!(writer, "Parse successful.")?;
        writeln!(writer, "{RULE}")?;
    }
    Ok(())
}

/// Report how many sessions were scheduled and what each refused entry
/// collided with.
pub fn write_schedule_results<W: Write>(
    writer: &mut W,
    results: &ScheduleResults,
) -> io::Result<()> {
    let attempted = results.successes.len() + results.conflicts.len();
    writeln!(
        writer,
        "Successfully scheduled {}/{} sessions.",
        results.successes.len(),
        attempted
    )?;
    writeln!(writer, "{RULE}")?;
    if results.conflicts.is_empty() {
        writeln!(writer, "All sessions scheduled successfully!")?;
        return Ok(());
    }

    writeln!(
        writer,
        "There were already scheduled recordings at the times requested."
    )?;
    writeln!(writer, "{RULE}")?;
    for (recording, existing) in &results.conflicts {
        let window = match (recording.start, recording.end()) {
            (Some(start), Some(end)) => {
                format!("from {} to {}", local_time(start), local_time(end))
            }
            _ => "with no scheduled window".to_string(),
        };
        writeln!(
            writer,
            "The recording \"{}\" {} conflicts with the following existing recordings:",
            recording.session_name, window
        )?;
        for conflict in existing {
            write_existing_conflict(writer, conflict)?;
        }
        if existing.is_empty() {
            writeln!(writer, "    (submission failed, no conflict details)")?;
            writeln!(writer, "{RULE}")?;
        }
    }
    Ok(())
}

fn write_existing_conflict<W: Write>(
    writer: &mut W,
    conflict: &ScheduledSessionInfo,
) -> io::Result<()> {
    writeln!(writer, "    Session Name:  {}", conflict.session_name)?;
    writeln!(writer, "    Session ID:    {}", conflict.session_id)?;
    writeln!(writer, "    Start Time:    {}", local_time(conflict.start_time))?;
    writeln!(writer, "    End Time:      {}", local_time(conflict.end_time))?;
    writeln!(writer, "{RULE}")?;
    Ok(())
}

/// Fetch the created sessions' details and write them to a timestamped
/// success CSV in `logs_dir`. The file carries only a header when nothing
/// was scheduled. Returns the written path.
pub async fn write_success_file(
    service: &dyn SchedulingService,
    successes: &[Uuid],
    logs_dir: &Path,
    stamp: &str,
) -> Result<PathBuf> {
    let sessions = service
        .sessions_by_id(successes)
        .await
        .context("failed to fetch scheduled session details")?;

    let path = logs_dir.join(format!("{stamp}_success_output.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create success file {}", path.display()))?;
    if sessions.is_empty() {
        // Serialization only emits the header alongside a first record;
        // an empty run still gets a header-only file.
        writer
            .write_record([
                "recorder_id",
                "folder_id",
                "session_id",
                "session_name",
                "start_time",
                "end_time",
            ])
            .context("failed to write the success header")?;
    }
    for session in &sessions {
        let scheduled = ScheduledSession {
            recorder_id: session.recorder_ids.first().copied().unwrap_or_else(Uuid::nil),
            folder_id: session.folder_id,
            session_id: session.id,
            session_name: session.name.clone(),
            start_time: session.start_time,
            end_time: match (session.start_time, session.duration) {
                (Some(start), Some(duration)) => Some(start + duration),
                _ => None,
            },
        };
        writer
            .serialize(scheduled.to_csv_row())
            .context("failed to write a success row")?;
    }
    writer.flush().context("failed to flush the success file")?;
    Ok(path)
}
