//! Error types for the state service

use easel_document::{DocumentError, DocumentKind, FileId};

/// Errors raised by [`crate::Workbench`] operations
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The file has no snapshot in the store; callers should fetch it
    #[error("file {0} is not loaded")]
    NotLoaded(FileId),

    /// The kind has no empty draft payload (runs, alerts, connections
    /// need explicit initial content)
    #[error("cannot draft a {0} without initial content")]
    NotDraftable(DocumentKind),

    /// Patch validation or kind mismatch
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_loaded_display() {
        let err = StateError::NotLoaded(FileId::new(-1).unwrap());
        assert_eq!(err.to_string(), "file -1 is not loaded");
    }
}
