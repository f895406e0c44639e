//! Easel Document Model
//!
//! Typed documents for the workbench, with content revisions and
//! partial-update patches.
//!
//! # Core Concepts
//!
//! - [`FileRecord`]: persisted snapshot of one document
//! - [`FileId`]: non-zero id, negative for virtual drafts, positive once
//!   published
//! - [`DocumentKind`] / [`DocumentContent`]: tagged union over every
//!   document type (question, dashboard, report, alert, presentation,
//!   connection, run log, conversation)
//! - [`DocumentPatch`]: typed, validated, shallow partial updates, the
//!   currency of change buffers
//! - [`ContentRevision`]: Blake3 content digest used as the
//!   optimistic-concurrency token on publish
//! - [`RunRecord`]: immutable execution record stored under a log path
//!
//! # Example
//!
//! ```rust,ignore
//! use easel_document::{DocumentPatch, QuestionPatch};
//!
//! let mut buffer = DocumentPatch::Question(QuestionPatch::default());
//! buffer.merge(DocumentPatch::Question(QuestionPatch {
//!     query: Some("SELECT 1".into()),
//!     ..QuestionPatch::default()
//! }))?;
//! buffer.apply_to(&mut record.content)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod id;
mod kind;
mod meta;
mod patch;
mod revision;

// Re-exports
pub use error::DocumentError;
pub use id::{DraftIds, FileId};
pub use kind::DocumentKind;
pub use meta::FileRecord;
pub use patch::{
    AlertPatch, ConnectionPatch, DashboardPatch, DocumentPatch, Patch, PresentationPatch,
    QuestionPatch, ReportPatch,
};
pub use revision::ContentRevision;

/// Per-kind content payloads
pub mod content;

/// URL slugs and canonical document URLs
pub mod slug;

/// Immutable run records
pub mod run;

pub use content::DocumentContent;
pub use run::{RunRecord, RunStatus, RunTrigger};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::content::QuestionContent;
    use crate::patch::QuestionPatch;
    use chrono::Utc;

    #[test]
    fn full_document_lifecycle() {
        // Draft with a virtual id
        let drafts = DraftIds::new();
        let id = drafts.allocate();
        assert!(id.is_virtual());

        let mut record = FileRecord::new(
            id,
            "New Question",
            "/drafts",
            DocumentKind::Question,
            DocumentContent::default_for(DocumentKind::Question).unwrap(),
            Utc::now(),
        )
        .unwrap();

        let before = record.revision().unwrap();

        // Buffer an edit and apply it
        let patch = DocumentPatch::Question(QuestionPatch {
            query: Some("SELECT 1".to_string()),
            ..QuestionPatch::default()
        });
        patch.validate().unwrap();
        patch.apply_to(&mut record.content).unwrap();

        assert_ne!(before, record.revision().unwrap());
        let DocumentContent::Question(QuestionContent { query, .. }) = &record.content else {
            panic!("kind changed");
        };
        assert_eq!(query, "SELECT 1");
    }

    #[test]
    fn canonical_url_uses_slug() {
        let record = FileRecord::new(
            FileId::new(31).unwrap(),
            "Q3 Revenue (EU)",
            "/finance",
            DocumentKind::Question,
            DocumentContent::default_for(DocumentKind::Question).unwrap(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.canonical_url(), "/f/31-q3-revenue-eu");
    }
}
