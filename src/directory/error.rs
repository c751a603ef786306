//! Error types for remote-site operations.

use uuid::Uuid;

/// Result type for calls against the remote site.
pub type SiteResult<T> = Result<T, SiteError>;

/// Error raised by a directory lookup or scheduling call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SiteError {
    /// The transport failed before a response arrived.
    /// Typically transient and worth retrying.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// The call did not complete within the collaborator's deadline.
    #[error("timeout: {message}")]
    Timeout { message: String },

    /// The site answered but refused or could not serve the request.
    #[error("api error: {message}")]
    Api { message: String },

    /// The requested entity does not exist on the site.
    #[error("not found: {entity} {id}")]
    NotFound { entity: &'static str, id: Uuid },
}

impl SiteError {
    pub fn connection(message: impl Into<String>) -> Self {
        SiteError::Connection {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        SiteError::Timeout {
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        SiteError::Api {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        SiteError::NotFound { entity, id }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SiteError::Connection { .. } | SiteError::Timeout { .. })
    }
}

/// Why a name could not be resolved to a directory identifier.
///
/// The original tooling collapsed all of these into an empty identifier;
/// keeping the reason lets callers and reports tell a missing entry from a
/// flaky directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The directory has no entry under that name.
    NotFound,
    /// More than one entry matched; an arbitrary pick is never made.
    Ambiguous,
    /// The lookup kept failing after the bounded retries.
    TimedOut,
}

/// Outcome of resolving a name against a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Uuid),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// The resolved identifier, or [`Uuid::nil`] as the unresolved
    /// placeholder the canonical model uses.
    pub fn id_or_nil(&self) -> Uuid {
        match self {
            Resolution::Resolved(id) => *id,
            Resolution::Unresolved(_) => Uuid::nil(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}
