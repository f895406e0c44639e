//! Error types for the document model

use crate::kind::DocumentKind;

/// Errors related to document construction and patching
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// File id is zero (reserved)
    #[error("invalid file id: {0}")]
    InvalidId(i64),

    /// Content or patch kind does not match the document kind
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: DocumentKind,
        actual: DocumentKind,
    },

    /// Unknown document kind string
    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    /// Typed validation failed before merge or save
    #[error("validation failed: {0}")]
    Validation(String),

    /// Revision length is not 32 bytes
    #[error("invalid revision length: expected 32, got {0}")]
    InvalidRevisionLength(usize),

    /// Revision hex decoding failed
    #[error("revision decode error: {0}")]
    RevisionDecode(#[from] hex::FromHexError),

    /// Content could not be canonically encoded
    #[error("content encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl DocumentError {
    /// Construct a validation error from any displayable reason
    #[inline]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}
