//! Schedule-file parsing: format detection, row normalization, directory
//! resolution, and conflict checking over the normalized batch.
//!
//! A file is read row by row. The first row matching a known header selects
//! the format; every following row is normalized by that format's rule set,
//! resolved against the site directory, validity-checked, and appended to
//! the batch with its 1-based line number. Local failures are recorded in
//! the line→code error map and never abort the run.

pub mod datetime;
pub mod formats;

mod banner;
mod georgetown;
mod legacy;
mod mediasite;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::StringRecord;
use tracing::{debug, info};
use uuid::Uuid;

use crate::directory::{resolve_folder, FolderDirectory, RecorderCache, RecorderDirectory};
use crate::models::{Recording, ValidityCode};
use crate::scheduler::conflicts::check_conflicts;
use formats::FileFormat;

/// Sentinel key in the error map for "no recognizable header in the whole
/// file". Real line numbers are 1-based, so 0 never collides.
pub const GLOBAL_PARSE_ERROR_LINE: usize = 0;

/// Run-level inputs that are not in the file itself.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// First day of the term; carries Banner begin times.
    pub term_start: Option<NaiveDate>,
    /// Last day of the term; carries Banner end times.
    pub term_end: Option<NaiveDate>,
    /// Term label appended to derived folder names.
    pub term: Option<String>,
    /// Folder every Mediasite row files into, bypassing folder lookup.
    pub mediasite_folder_id: Option<Uuid>,
}

/// A normalized entry together with the file line it came from.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub line: usize,
    pub recording: Recording,
}

/// Everything a parse run produces.
#[derive(Debug, Default)]
pub struct ParseOutput {
    /// The detected format, if any header matched.
    pub format: Option<FileFormat>,
    /// Entries that are valid and conflict-free, ready for submission.
    pub accepted: Vec<Recording>,
    /// Line number to validity code for every local failure.
    pub errors: BTreeMap<usize, ValidityCode>,
    /// Entries that were invalid or collided with an earlier entry.
    pub conflicts: Vec<Recording>,
}

impl ParseOutput {
    /// True when no header was recognized anywhere in the file.
    pub fn unsupported_format(&self) -> bool {
        self.errors.contains_key(&GLOBAL_PARSE_ERROR_LINE)
    }
}

pub(crate) fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

/// Parse a schedule file from disk.
pub async fn parse_file(
    path: &Path,
    recorders: &dyn RecorderDirectory,
    folders: &dyn FolderDirectory,
    cache: &mut RecorderCache,
    options: &ParseOptions,
) -> Result<ParseOutput> {
    let file = File::open(path)
        .with_context(|| format!("failed to open schedule file {}", path.display()))?;
    parse_reader(file, recorders, folders, cache, options).await
}

/// Parse a schedule from any reader. See the module docs for the pipeline.
pub async fn parse_reader<R: Read>(
    reader: R,
    recorders: &dyn RecorderDirectory,
    folders: &dyn FolderDirectory,
    cache: &mut RecorderCache,
    options: &ParseOptions,
) -> Result<ParseOutput> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let now = Utc::now();
    let term = options.term.as_deref().unwrap_or("");
    let mut errors: BTreeMap<usize, ValidityCode> = BTreeMap::new();
    let mut batch: Vec<ParsedRow> = Vec::new();
    let mut format: Option<FileFormat> = None;

    for record in csv_reader.records() {
        let record = record.context("failed to read a row from the schedule file")?;
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(GLOBAL_PARSE_ERROR_LINE);

        let Some(detected) = format else {
            let fields: Vec<&str> = record.iter().collect();
            if let Some(matched) = formats::detect(&fields) {
                info!(?matched, line, "schedule header recognized");
                format = Some(matched);
            }
            continue;
        };

        if record.len() != detected.arity() {
            errors.insert(line, ValidityCode::ParseError);
            continue;
        }
        if detected == FileFormat::Georgetown && field(&record, 1).is_empty() {
            // Scheduled manually elsewhere; drop the row without an error.
            continue;
        }

        let recording = match detected {
            FileFormat::Legacy => legacy::normalize(&record),
            FileFormat::Banner => {
                banner::normalize(&record, options.term_start, options.term_end, term)
            }
            FileFormat::Georgetown => georgetown::normalize(&record, term),
            FileFormat::Mediasite => mediasite::normalize(&record, options.mediasite_folder_id),
        };
        resolve_and_record(
            recording, line, recorders, folders, cache, now, &mut errors, &mut batch,
        )
        .await;
        if line % 10 == 0 {
            debug!(line, "normalizing schedule rows");
        }
    }

    let conflicts = match format {
        Some(_) => check_conflicts(&batch, &mut errors, now),
        None => {
            errors.insert(GLOBAL_PARSE_ERROR_LINE, ValidityCode::ParseError);
            Vec::new()
        }
    };

    let accepted = batch
        .into_iter()
        .filter(|row| {
            !errors.contains_key(&row.line)
                && row.recording.check_validity(now) == ValidityCode::Valid
        })
        .map(|row| row.recording)
        .collect();

    Ok(ParseOutput {
        format,
        accepted,
        errors,
        conflicts,
    })
}

/// Shared post-normalization step, identical for every format: resolve the
/// recorder id through the cache, resolve or default the folder id, then
/// validity-check and append to the batch.
#[allow(clippy::too_many_arguments)]
async fn resolve_and_record(
    mut recording: Recording,
    line: usize,
    recorders: &dyn RecorderDirectory,
    folders: &dyn FolderDirectory,
    cache: &mut RecorderCache,
    now: DateTime<Utc>,
    errors: &mut BTreeMap<usize, ValidityCode>,
    batch: &mut Vec<ParsedRow>,
) {
    recording.recorder_id = cache
        .resolve(&recording.recorder_name, recorders)
        .await
        .id_or_nil();

    if !recording.folder_name.is_empty() && recording.folder_id.is_nil() {
        recording.folder_id = resolve_folder(&recording.folder_name, folders)
            .await
            .id_or_nil();
    } else if recording.folder_name.is_empty()
        && recording.folder_id.is_nil()
        && !recording.recorder_id.is_nil()
    {
        // No folder given: adopt the recorder's default folder, name included.
        if let Ok(folder_id) = recorders.default_folder_for(recording.recorder_id).await {
            recording.folder_id = folder_id;
            if let Ok(found) = folders.folders_by_id(&[folder_id]).await {
                if let Some(folder) = found.first() {
                    recording.folder_name = folder.name.clone();
                }
            }
        }
    }

    let code = recording.check_validity(now);
    if code != ValidityCode::Valid {
        errors.insert(line, code);
    }
    batch.push(ParsedRow { line, recording });
}
