//! Canonical recording-request model.
//!
//! Every supported input format normalizes into a [`Recording`]. A recording
//! that repeats weekly carries an optional [`Recurrence`] sub-record instead
//! of being a separate type, so validity checking and conflict detection
//! stay a single code path.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cadence::Weekdays;

/// Outcome of validating a single recording request.
///
/// Exactly one code describes an entry at any time; the code is derived from
/// the entry's current fields and never stored on the entry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityCode {
    Valid,
    ParseError,
    TimeConflict,
    BadRecorderId,
    BadFolderId,
    BadSessionId,
    BadSessionName,
    BadPresenter,
    BadStartDate,
    BadDuration,
    BadEndDate,
    BadCadence,
}

impl ValidityCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityCode::Valid => "Valid",
            ValidityCode::ParseError => "ParseError",
            ValidityCode::TimeConflict => "TimeConflict",
            ValidityCode::BadRecorderId => "BadRecorderId",
            ValidityCode::BadFolderId => "BadFolderId",
            ValidityCode::BadSessionId => "BadSessionId",
            ValidityCode::BadSessionName => "BadSessionName",
            ValidityCode::BadPresenter => "BadPresenter",
            ValidityCode::BadStartDate => "BadStartDate",
            ValidityCode::BadDuration => "BadDuration",
            ValidityCode::BadEndDate => "BadEndDate",
            ValidityCode::BadCadence => "BadCadence",
        }
    }
}

impl std::fmt::Display for ValidityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly repetition of a recording: the last date it occurs on and the
/// weekdays it occurs on.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    /// Last date the recording occurs, inclusive. `None` means the source
    /// row did not carry a parsable end date.
    pub end_date: Option<DateTime<Utc>>,
    pub cadence: Weekdays,
}

/// A recording to be scheduled on a remote recorder.
///
/// Identifiers start out as [`Uuid::nil`] placeholders; normalization
/// resolves them against the site directory exactly once. After resolution
/// the entry is read-only for validity checking and conflict detection; the
/// one sanctioned late mutation is aligning `start` onto the cadence
/// immediately before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub recorder_id: Uuid,
    pub recorder_name: String,
    pub folder_id: Uuid,
    pub folder_name: String,
    pub session_name: String,
    pub is_broadcast: bool,
    /// Absolute start instant. `None` means the source row did not carry a
    /// parsable date/time; never defaulted to the current time.
    pub start: Option<DateTime<Utc>>,
    pub duration: TimeDelta,
    /// Presenter of the session. May be empty, never absent.
    pub presenter: String,
    pub recurrence: Option<Recurrence>,
}

impl Default for Recording {
    fn default() -> Self {
        Recording {
            recorder_id: Uuid::nil(),
            recorder_name: String::new(),
            folder_id: Uuid::nil(),
            folder_name: String::new(),
            session_name: String::new(),
            is_broadcast: false,
            start: None,
            duration: TimeDelta::zero(),
            presenter: String::new(),
            recurrence: None,
        }
    }
}

impl Recording {
    /// End instant of the first (or only) occurrence.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.start.map(|s| s + self.duration)
    }

    /// Whether both directory identifiers have been resolved.
    pub fn is_resolved(&self) -> bool {
        !self.recorder_id.is_nil() && !self.folder_id.is_nil()
    }

    /// Validate this recording against `now`.
    ///
    /// The rule chain is fixed-order and returns the first violated rule.
    /// Recurrence rules run before the base rules. The result is a pure
    /// function of the current field state; recomputing it without any
    /// mutation in between always yields the same code.
    pub fn check_validity(&self, now: DateTime<Utc>) -> ValidityCode {
        if let Some(recurrence) = &self.recurrence {
            match recurrence.end_date {
                None => return ValidityCode::BadEndDate,
                Some(end_date) => {
                    if let Some(start) = self.start {
                        if end_date < start {
                            // end date must not precede the start date
                            return ValidityCode::BadEndDate;
                        }
                    }
                }
            }
            if !recurrence.cadence.is_valid() {
                return ValidityCode::BadCadence;
            }
        }
        if self.recorder_id.is_nil() {
            return ValidityCode::BadRecorderId;
        }
        if self.folder_id.is_nil() {
            return ValidityCode::BadFolderId;
        }
        if self.session_name.is_empty() {
            return ValidityCode::BadSessionName;
        }
        // Presenter non-nullness is guaranteed by the type; the
        // BadPresenter code survives for reporting compatibility.
        match self.start {
            None => return ValidityCode::BadStartDate,
            Some(start) => {
                if start < now {
                    // recordings cannot be scheduled in the past
                    return ValidityCode::BadStartDate;
                }
            }
        }
        if self.duration <= TimeDelta::zero() {
            return ValidityCode::BadDuration;
        }
        ValidityCode::Valid
    }
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod recording_tests;
