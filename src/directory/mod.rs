//! External collaborators of the scheduling pipeline.
//!
//! The remote site exposes three services: the recorder directory, the
//! folder directory, and the scheduling endpoint. Each is modeled as an
//! async trait so the pipeline can run against the production transport or
//! the in-memory [`LocalSite`] double interchangeably. All calls are awaited
//! sequentially; the core performs no parallel requests.

pub mod cache;
pub mod error;
pub mod local;
pub mod resolve;

pub use cache::RecorderCache;
pub use error::{Resolution, SiteError, SiteResult, UnresolvedReason};
pub use local::LocalSite;
pub use resolve::resolve_folder;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorder as listed by the recorder directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderSummary {
    pub id: Uuid,
    pub name: String,
}

/// One page of the recorder listing.
#[derive(Debug, Clone)]
pub struct RecorderPage {
    /// Total number of recorders on the site, independent of paging.
    pub total: usize,
    pub recorders: Vec<RecorderSummary>,
}

/// A folder as returned by the folder directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub id: Uuid,
    pub name: String,
}

/// Details of a session the site already has on its calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub recorder_ids: Vec<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<TimeDelta>,
}

/// A pre-existing session that conflicts with a submitted recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSessionInfo {
    pub recorder_id: Uuid,
    pub folder_id: Uuid,
    pub session_id: Uuid,
    pub session_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// What the site did with a submitted recording.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// The site created these sessions.
    Created { session_ids: Vec<Uuid> },
    /// The site refused; these already-scheduled sessions overlap the
    /// request. The list is empty when the submission itself failed.
    Conflicted { existing: Vec<ScheduledSessionInfo> },
}

impl ScheduleOutcome {
    pub fn conflicts_exist(&self) -> bool {
        matches!(self, ScheduleOutcome::Conflicted { .. })
    }
}

/// One recording as submitted to the scheduling endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub session_name: String,
    pub folder_id: Uuid,
    pub is_broadcast: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub recorder_id: Uuid,
}

/// Recorder directory of the remote site.
#[async_trait]
pub trait RecorderDirectory: Send + Sync {
    /// Fetch one page of the site's recorder listing.
    async fn list_recorders(&self, page: u32, per_page: u32) -> SiteResult<RecorderPage>;

    /// The folder a recorder records into when none is specified.
    async fn default_folder_for(&self, recorder_id: Uuid) -> SiteResult<Uuid>;
}

/// Folder directory of the remote site.
#[async_trait]
pub trait FolderDirectory: Send + Sync {
    /// Search folders by name. A query wrapped in double quotes requests an
    /// exact-name match.
    async fn search_folders(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> SiteResult<Vec<FolderSummary>>;

    /// Look up folders by identifier, preserving input order.
    async fn folders_by_id(&self, ids: &[Uuid]) -> SiteResult<Vec<FolderSummary>>;
}

/// Scheduling endpoint of the remote site.
#[async_trait]
pub trait SchedulingService: Send + Sync {
    /// Submit a single recording for scheduling.
    async fn schedule_recording(&self, request: &SessionRequest) -> SiteResult<ScheduleOutcome>;

    /// Register the weekly repetition of an already-created session.
    async fn schedule_recurring(
        &self,
        session_id: Uuid,
        days: &[Weekday],
        end_date: DateTime<Utc>,
    ) -> SiteResult<ScheduleOutcome>;

    /// Fetch details of sessions by identifier.
    async fn sessions_by_id(&self, ids: &[Uuid]) -> SiteResult<Vec<SessionDetail>>;
}
