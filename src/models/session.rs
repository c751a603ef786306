//! Scheduled-session records written to the success output file.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recording::ValidityCode;

/// One successfully scheduled session, as reported back by the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub recorder_id: Uuid,
    pub folder_id: Uuid,
    pub session_id: Uuid,
    pub session_name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ScheduledSession {
    /// Validate the record the site handed back.
    pub fn check_validity(&self, now: DateTime<Utc>) -> ValidityCode {
        if self.recorder_id.is_nil() {
            return ValidityCode::BadRecorderId;
        }
        if self.folder_id.is_nil() {
            return ValidityCode::BadFolderId;
        }
        if self.session_id.is_nil() {
            return ValidityCode::BadSessionId;
        }
        if self.session_name.is_empty() {
            return ValidityCode::BadSessionName;
        }
        let start = match self.start_time {
            None => return ValidityCode::BadStartDate,
            Some(start) if start < now => return ValidityCode::BadStartDate,
            Some(start) => start,
        };
        match self.end_time {
            None => ValidityCode::BadEndDate,
            Some(end) if end <= start => ValidityCode::BadEndDate,
            Some(_) => ValidityCode::Valid,
        }
    }

    /// Row shape for the success CSV, with instants rendered in local time.
    pub fn to_csv_row(&self) -> SessionRow {
        SessionRow {
            recorder_id: self.recorder_id,
            folder_id: self.folder_id,
            session_id: self.session_id,
            session_name: self.session_name.clone(),
            start_time: self
                .start_time
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            end_time: self
                .end_time
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Serialized form of a [`ScheduledSession`] in the success output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub recorder_id: Uuid,
    pub folder_id: Uuid,
    pub session_id: Uuid,
    pub session_name: String,
    pub start_time: String,
    pub end_time: String,
}
