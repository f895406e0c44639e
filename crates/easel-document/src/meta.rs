//! File records
//!
//! A [`FileRecord`] is the persisted snapshot of one document: identity,
//! location, kind, content, and server timestamp. Records are immutable in
//! client state: views read them through the merge resolver and the save
//! coordinator replaces them wholesale with the backend's canonical copy.

use crate::content::DocumentContent;
use crate::error::DocumentError;
use crate::id::FileId;
use crate::kind::DocumentKind;
use crate::revision::ContentRevision;
use crate::slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted snapshot of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File identity (negative while a draft)
    pub id: FileId,
    /// Display name
    pub name: String,
    /// Folder path, e.g. `/finance/questions`
    pub path: String,
    /// Document kind; always matches `content.kind()`
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Type-specific payload
    pub content: DocumentContent,
    /// Server-side last-modified timestamp
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record, enforcing the kind/content match
    ///
    /// # Errors
    /// Returns [`DocumentError::KindMismatch`] if `kind` does not match
    /// the content payload
    pub fn new(
        id: FileId,
        name: impl Into<String>,
        path: impl Into<String>,
        kind: DocumentKind,
        content: DocumentContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DocumentError> {
        if content.kind() != kind {
            return Err(DocumentError::KindMismatch {
                expected: kind,
                actual: content.kind(),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            path: path.into(),
            kind,
            content,
            updated_at,
        })
    }

    /// Optimistic-concurrency token: Blake3 over the canonical content
    ///
    /// # Errors
    /// Returns error if the content cannot be canonically encoded
    #[inline]
    pub fn revision(&self) -> Result<ContentRevision, DocumentError> {
        ContentRevision::of(&self.content)
    }

    /// URL slug derived from the name
    #[inline]
    #[must_use]
    pub fn slug(&self) -> String {
        slug::slugify(&self.name)
    }

    /// Canonical URL: `/f/{id}-{slug}`
    #[inline]
    #[must_use]
    pub fn canonical_url(&self) -> String {
        slug::canonical_url(self.id, &self.name)
    }
}
