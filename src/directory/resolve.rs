//! Folder-name resolution against the folder directory.

use tracing::warn;
use uuid::Uuid;

use super::error::{Resolution, UnresolvedReason};
use super::FolderDirectory;

/// How many times a folder search is attempted before giving up.
/// Retries are back-to-back; the collaborator owns its own deadline.
const SEARCH_RETRIES: u32 = 3;

/// Page size for folder searches.
const SEARCH_PAGE_SIZE: u32 = 10;

/// Resolve a folder name to its identifier.
///
/// A GUID-shaped name is trusted verbatim without a lookup. Otherwise the
/// directory is searched for the exact name (the query is quoted); exactly
/// one match resolves, zero matches is not-found, and more than one match is
/// ambiguous rather than an arbitrary pick. A search that keeps failing
/// resolves to timed-out after the bounded retries.
pub async fn resolve_folder(name: &str, directory: &dyn FolderDirectory) -> Resolution {
    if name.is_empty() {
        return Resolution::Unresolved(UnresolvedReason::NotFound);
    }
    if let Ok(id) = Uuid::parse_str(name) {
        return Resolution::Resolved(id);
    }

    let query = format!("\"{}\"", name);
    for _ in 0..SEARCH_RETRIES {
        let results = match directory.search_folders(&query, 0, SEARCH_PAGE_SIZE).await {
            Ok(results) => results,
            Err(_) => continue,
        };
        return match results.len() {
            1 => Resolution::Resolved(results[0].id),
            0 => Resolution::Unresolved(UnresolvedReason::NotFound),
            n => {
                let names: Vec<&str> = results.iter().map(|f| f.name.as_str()).collect();
                warn!(folder = name, matches = n, ?names, "folder name is ambiguous");
                Resolution::Unresolved(UnresolvedReason::Ambiguous)
            }
        };
    }
    Resolution::Unresolved(UnresolvedReason::TimedOut)
}
