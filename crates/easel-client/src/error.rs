//! API error taxonomy
//!
//! Backend failures fall into a small set of kinds. Only messages the
//! backend explicitly marks as user-facing are ever surfaced verbatim;
//! everything else collapses to a generic fallback so raw internals never
//! leak into views.

/// Fallback shown for errors that are not user-facing
pub const GENERIC_ERROR_MESSAGE: &str = "an unexpected error occurred";

/// Message shown for optimistic-concurrency rejections
pub const CONFLICT_MESSAGE: &str = "this document was changed elsewhere; reload before saving";

/// Errors from the backend port
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend-declared user error; the message is trusted and surfaced
    /// verbatim
    #[error("{message}")]
    UserFacing { message: String },

    /// Optimistic-concurrency rejection: the base revision no longer
    /// matches the stored document
    #[error("revision conflict: {message}")]
    Conflict { message: String },

    /// The document does not exist (or was deleted)
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other backend rejection
    #[error("backend error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Network-level failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the configured base
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True for backend-declared user errors
    #[inline]
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::UserFacing { .. })
    }

    /// True for optimistic-concurrency rejections
    #[inline]
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The message a view may show: verbatim for user-facing errors, a
    /// fixed explanation for conflicts, the generic fallback otherwise
    #[must_use]
    pub fn surface_message(&self) -> String {
        match self {
            Self::UserFacing { message } => message.clone(),
            Self::Conflict { .. } => CONFLICT_MESSAGE.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
