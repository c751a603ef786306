//! Memoized recorder-name resolution.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use super::error::{Resolution, UnresolvedReason};
use super::RecorderDirectory;

/// Page size used when enumerating the site's recorders.
const LIST_PAGE_SIZE: u32 = 5;

/// Process-lifetime cache of recorder names to identifiers.
///
/// The cache is populated in one paginated sweep of the directory on the
/// first miss and is never invalidated during a run; a recorder renamed
/// mid-run is an accepted staleness. Construct one per run and pass it into
/// normalization explicitly.
#[derive(Debug, Default)]
pub struct RecorderCache {
    names: HashMap<String, Uuid>,
    populated: bool,
}

impl RecorderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a recorder name, case-insensitively.
    ///
    /// The first miss triggers a full paginated enumeration of the
    /// directory; afterwards every lookup is answered from memory. A
    /// directory failure during enumeration resolves to
    /// [`UnresolvedReason::TimedOut`] and leaves the cache unpopulated so a
    /// later entry can retry the sweep.
    pub async fn resolve(&mut self, name: &str, directory: &dyn RecorderDirectory) -> Resolution {
        if name.is_empty() {
            return Resolution::Unresolved(UnresolvedReason::NotFound);
        }
        let key = name.to_lowercase();
        if let Some(id) = self.names.get(&key) {
            return Resolution::Resolved(*id);
        }
        if self.populated {
            return Resolution::Unresolved(UnresolvedReason::NotFound);
        }

        let mut page = 0u32;
        loop {
            let response = match directory.list_recorders(page, LIST_PAGE_SIZE).await {
                Ok(response) => response,
                Err(err) => {
                    debug!(page, error = %err, "recorder listing failed");
                    return Resolution::Unresolved(UnresolvedReason::TimedOut);
                }
            };
            for recorder in &response.recorders {
                self.names
                    .insert(recorder.name.to_lowercase(), recorder.id);
            }
            if (page + 1) as usize * LIST_PAGE_SIZE as usize >= response.total {
                break;
            }
            page += 1;
        }
        self.populated = true;
        debug!(recorders = self.names.len(), "recorder cache populated");

        match self.names.get(&key) {
            Some(id) => Resolution::Resolved(*id),
            None => Resolution::Unresolved(UnresolvedReason::NotFound),
        }
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
