//! In-memory stand-in for the remote site.
//!
//! Implements all three collaborator traits over interior-mutability state,
//! for unit tests and local development runs. Failure toggles simulate a
//! flaky directory so retry and timeout paths can be exercised.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{SiteError, SiteResult};
use super::{
    FolderDirectory, FolderSummary, RecorderDirectory, RecorderPage, RecorderSummary,
    ScheduleOutcome, ScheduledSessionInfo, SchedulingService, SessionDetail, SessionRequest,
};

#[derive(Debug, Clone)]
struct Booking {
    recorder_id: Uuid,
    session_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SiteState {
    recorders: Vec<RecorderSummary>,
    folders: Vec<FolderSummary>,
    default_folders: HashMap<Uuid, Uuid>,
    sessions: Vec<SessionDetail>,
    bookings: Vec<Booking>,
    recurrences: HashMap<Uuid, (Vec<Weekday>, DateTime<Utc>)>,
    recorder_list_calls: usize,
    folder_search_calls: usize,
    fail_recorder_listing: bool,
    fail_folder_search: bool,
    conflict_on_recurring: bool,
}

/// Declarative description of a site, loadable from JSON for dev runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteFixture {
    #[serde(default)]
    pub recorders: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
    /// Recorder name to default-folder name.
    #[serde(default)]
    pub default_folders: HashMap<String, String>,
}

/// In-memory site implementing the recorder directory, folder directory,
/// and scheduling service.
#[derive(Debug, Default)]
pub struct LocalSite {
    state: Mutex<SiteState>,
}

impl LocalSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a site from a fixture description. Every recorder named in
    /// `default_folders` must exist in `recorders`; folders named there are
    /// created on demand.
    pub fn from_fixture(fixture: &SiteFixture) -> Self {
        let site = LocalSite::new();
        let mut recorder_ids = HashMap::new();
        for name in &fixture.recorders {
            recorder_ids.insert(name.clone(), site.add_recorder(name));
        }
        let mut folder_ids = HashMap::new();
        for name in &fixture.folders {
            folder_ids.insert(name.clone(), site.add_folder(name));
        }
        for (recorder, folder) in &fixture.default_folders {
            let folder_id = *folder_ids
                .entry(folder.clone())
                .or_insert_with(|| site.add_folder(folder));
            if let Some(recorder_id) = recorder_ids.get(recorder) {
                site.set_default_folder(*recorder_id, folder_id);
            }
        }
        site
    }

    pub fn add_recorder(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().recorders.push(RecorderSummary {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_folder(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().folders.push(FolderSummary {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn set_default_folder(&self, recorder_id: Uuid, folder_id: Uuid) {
        self.state.lock().default_folders.insert(recorder_id, folder_id);
    }

    pub fn set_fail_recorder_listing(&self, fail: bool) {
        self.state.lock().fail_recorder_listing = fail;
    }

    pub fn set_fail_folder_search(&self, fail: bool) {
        self.state.lock().fail_folder_search = fail;
    }

    /// Make the next recurrence registrations report a conflict.
    pub fn set_conflict_on_recurring(&self, conflict: bool) {
        self.state.lock().conflict_on_recurring = conflict;
    }

    pub fn recorder_list_calls(&self) -> usize {
        self.state.lock().recorder_list_calls
    }

    pub fn folder_search_calls(&self) -> usize {
        self.state.lock().folder_search_calls
    }

    /// Number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// The recurrence registered for a session, if any.
    pub fn recurrence_for(&self, session_id: Uuid) -> Option<(Vec<Weekday>, DateTime<Utc>)> {
        self.state.lock().recurrences.get(&session_id).cloned()
    }
}

#[async_trait]
impl RecorderDirectory for LocalSite {
    async fn list_recorders(&self, page: u32, per_page: u32) -> SiteResult<RecorderPage> {
        let mut state = self.state.lock();
        state.recorder_list_calls += 1;
        if state.fail_recorder_listing {
            return Err(SiteError::timeout("recorder listing unavailable"));
        }
        let mut sorted = state.recorders.clone();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let total = sorted.len();
        let recorders = sorted
            .into_iter()
            .skip(page as usize * per_page as usize)
            .take(per_page as usize)
            .collect();
        Ok(RecorderPage { total, recorders })
    }

    async fn default_folder_for(&self, recorder_id: Uuid) -> SiteResult<Uuid> {
        let state = self.state.lock();
        state
            .default_folders
            .get(&recorder_id)
            .copied()
            .ok_or(SiteError::not_found("default folder", recorder_id))
    }
}

#[async_trait]
impl FolderDirectory for LocalSite {
    async fn search_folders(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> SiteResult<Vec<FolderSummary>> {
        let mut state = self.state.lock();
        state.folder_search_calls += 1;
        if state.fail_folder_search {
            return Err(SiteError::timeout("folder search unavailable"));
        }
        // A quoted query requests an exact-name match.
        let needle = query.trim_matches('"').to_lowercase();
        Ok(state
            .folders
            .iter()
            .filter(|f| f.name.to_lowercase() == needle)
            .skip(page as usize * per_page as usize)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn folders_by_id(&self, ids: &[Uuid]) -> SiteResult<Vec<FolderSummary>> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.folders.iter().find(|f| f.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl SchedulingService for LocalSite {
    async fn schedule_recording(&self, request: &SessionRequest) -> SiteResult<ScheduleOutcome> {
        let mut state = self.state.lock();
        let overlapping: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| {
                b.recorder_id == request.recorder_id
                    && b.start < request.end
                    && request.start < b.end
            })
            .cloned()
            .collect();
        if !overlapping.is_empty() {
            let existing = overlapping
                .iter()
                .map(|b| {
                    let name = state
                        .sessions
                        .iter()
                        .find(|s| s.id == b.session_id)
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    ScheduledSessionInfo {
                        recorder_id: b.recorder_id,
                        folder_id: request.folder_id,
                        session_id: b.session_id,
                        session_name: name,
                        start_time: b.start,
                        end_time: b.end,
                    }
                })
                .collect();
            return Ok(ScheduleOutcome::Conflicted { existing });
        }

        let session_id = Uuid::new_v4();
        state.sessions.push(SessionDetail {
            id: session_id,
            name: request.session_name.clone(),
            folder_id: request.folder_id,
            recorder_ids: vec![request.recorder_id],
            start_time: Some(request.start),
            duration: Some(request.end - request.start),
        });
        state.bookings.push(Booking {
            recorder_id: request.recorder_id,
            session_id,
            start: request.start,
            end: request.end,
        });
        Ok(ScheduleOutcome::Created {
            session_ids: vec![session_id],
        })
    }

    async fn schedule_recurring(
        &self,
        session_id: Uuid,
        days: &[Weekday],
        end_date: DateTime<Utc>,
    ) -> SiteResult<ScheduleOutcome> {
        let mut state = self.state.lock();
        if state.conflict_on_recurring {
            return Ok(ScheduleOutcome::Conflicted { existing: vec![] });
        }
        if !state.sessions.iter().any(|s| s.id == session_id) {
            return Err(SiteError::not_found("session", session_id));
        }
        state
            .recurrences
            .insert(session_id, (days.to_vec(), end_date));
        Ok(ScheduleOutcome::Created {
            session_ids: vec![],
        })
    }

    async fn sessions_by_id(&self, ids: &[Uuid]) -> SiteResult<Vec<SessionDetail>> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.sessions.iter().find(|s| s.id == *id).cloned())
            .collect())
    }
}
