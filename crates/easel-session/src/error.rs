//! Session error taxonomy
//!
//! Errors are caught at the session boundary and converted to a local
//! message via [`SessionError::surface_message`]; raw internals never
//! reach a view.

use easel_client::ApiError;
use easel_document::{DocumentError, DocumentKind, FileId};
use easel_state::StateError;

/// Errors raised by sessions, saves, and runs
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The file has no snapshot; load it first
    #[error("file {0} is not loaded")]
    NotLoaded(FileId),

    /// Runs are refused while unsaved changes exist
    #[error("file {0} has unsaved changes; save before running")]
    DirtyDocument(FileId),

    /// One run per document at a time (client-side affordance only)
    #[error("a run is already in flight for file {0}")]
    RunInFlight(FileId),

    /// One save per session at a time
    #[error("a save is already in flight for file {0}")]
    SaveInFlight(FileId),

    /// Connection tests only apply to connection documents
    #[error("{0} documents cannot be connection-tested")]
    NotTestable(DocumentKind),

    /// Only reports and alerts execute as runs
    #[error("{0} documents cannot be run")]
    NotRunnable(DocumentKind),

    /// The in-flight run was cancelled through its abort handle
    #[error("run cancelled")]
    RunCancelled,

    /// Share-token management is admin-only
    #[error("admin access required")]
    Forbidden,

    /// Publish rejected; the change buffer is preserved
    #[error("save failed: {message}")]
    SaveFailed {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Fetch rejected; the caller owns the retry
    #[error("load failed: {message}")]
    LoadFailed {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Agent or run execution failed before a run could be recorded
    #[error("run failed: {message}")]
    RunFailed { message: String },

    /// Local typed validation refused the action; nothing was sent
    #[error("validation failed: {0}")]
    Validation(#[from] DocumentError),

    /// State service refused the operation
    #[error(transparent)]
    State(#[from] StateError),
}

impl SessionError {
    /// Wrap a publish rejection, preserving the surfaced message
    #[must_use]
    pub fn save_failed(source: ApiError) -> Self {
        Self::SaveFailed {
            message: source.surface_message(),
            source,
        }
    }

    /// Wrap a fetch rejection
    #[must_use]
    pub fn load_failed(source: ApiError) -> Self {
        Self::LoadFailed {
            message: source.surface_message(),
            source,
        }
    }

    /// The message a view may show for this error
    #[must_use]
    pub fn surface_message(&self) -> String {
        match self {
            Self::SaveFailed { message, .. }
            | Self::LoadFailed { message, .. }
            | Self::RunFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
