//! The workbench state service
//!
//! [`Workbench`] combines the file store and the change buffer behind one
//! injectable handle and derives merged content and dirty state as pure
//! functions. Views hold a clone of the handle; there is no ambient
//! global. All mutation goes through the named operations below; nothing
//! else touches the underlying maps.

use crate::buffer::{ChangeBuffer, FileEdits};
use crate::error::StateError;
use crate::store::FileStore;
use chrono::Utc;
use easel_document::{
    DocumentContent, DocumentKind, DocumentPatch, DraftIds, FileId, FileRecord,
};
use std::sync::Arc;

/// Handle to the shared document state
///
/// Cheap to clone; all clones observe the same state. Derivations
/// (`merged_content`, `is_dirty`, `effective_name`) are recomputed on
/// every call from the current snapshot and buffer; they are pure in
/// their inputs and never cached.
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    store: FileStore,
    buffer: ChangeBuffer,
    drafts: DraftIds,
}

impl Workbench {
    /// Create an empty workbench
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                store: FileStore::new(),
                buffer: ChangeBuffer::new(),
                drafts: DraftIds::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // File store
    // ------------------------------------------------------------------

    /// Insert or replace a full snapshot
    ///
    /// If the incoming record changes the document's kind, any buffered
    /// edits for it are stale and dropped.
    pub fn set_file(&self, record: FileRecord) {
        if let Some(edits) = self.inner.buffer.snapshot(record.id) {
            let stale = edits
                .content
                .as_ref()
                .or(edits.ephemeral.as_ref())
                .is_some_and(|patch| patch.kind() != record.kind);
            if stale {
                tracing::warn!(id = %record.id, "dropping stale buffer after kind change");
                self.inner.buffer.clear_all(record.id);
            }
        }
        self.inner.store.set(record);
    }

    /// Snapshot by id; `None` means "not yet loaded" and callers should
    /// trigger a fetch
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<FileRecord> {
        self.inner.store.get(id)
    }

    /// True once a snapshot for `id` has been loaded
    #[must_use]
    pub fn is_loaded(&self, id: FileId) -> bool {
        self.inner.store.contains(id)
    }

    /// Ids of every loaded file
    #[must_use]
    pub fn loaded_ids(&self) -> Vec<FileId> {
        self.inner.store.ids()
    }

    /// Drop a file and all of its buffered edits (delete, or a draft
    /// promoted to its real id)
    pub fn remove_file(&self, id: FileId) {
        self.inner.store.remove(id);
        self.inner.buffer.clear_all(id);
    }

    /// Create a virtual draft with the kind's empty payload
    ///
    /// # Errors
    /// Returns [`StateError::NotDraftable`] for kinds without an empty
    /// payload; seed those through [`Workbench::set_file`] with explicit
    /// content and a virtual id instead.
    pub fn create_draft(
        &self,
        kind: DocumentKind,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<FileId, StateError> {
        let content =
            DocumentContent::default_for(kind).ok_or(StateError::NotDraftable(kind))?;
        let id = self.inner.drafts.allocate();
        let record = FileRecord::new(id, name, path, kind, content, Utc::now())?;
        tracing::debug!(%id, %kind, "created draft");
        self.inner.store.set(record);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Change buffer
    // ------------------------------------------------------------------

    /// Buffer a persistable edit (validated, then merged last-write-wins)
    ///
    /// # Errors
    /// Returns [`StateError::NotLoaded`] if the file has no snapshot, or
    /// a validation / kind-mismatch error from the patch itself
    pub fn edit_content(&self, id: FileId, patch: DocumentPatch) -> Result<(), StateError> {
        let record = self.inner.store.get(id).ok_or(StateError::NotLoaded(id))?;
        Self::check_kind(&record, &patch)?;
        patch.validate()?;
        self.inner.buffer.edit_content(id, patch)?;
        Ok(())
    }

    /// Buffer a pending rename
    ///
    /// # Errors
    /// Returns [`StateError::NotLoaded`] if the file has no snapshot
    pub fn edit_name(&self, id: FileId, name: impl Into<String>) -> Result<(), StateError> {
        if !self.inner.store.contains(id) {
            return Err(StateError::NotLoaded(id));
        }
        self.inner.buffer.edit_name(id, name.into());
        Ok(())
    }

    /// Buffer an ephemeral, view-only overlay, merged for display but
    /// never part of a save payload
    ///
    /// # Errors
    /// Same failure modes as [`Workbench::edit_content`]
    pub fn set_ephemeral(&self, id: FileId, patch: DocumentPatch) -> Result<(), StateError> {
        let record = self.inner.store.get(id).ok_or(StateError::NotLoaded(id))?;
        Self::check_kind(&record, &patch)?;
        patch.validate()?;
        self.inner.buffer.set_ephemeral(id, patch)?;
        Ok(())
    }

    /// Drop the ephemeral overlay for a file
    pub fn clear_ephemeral(&self, id: FileId) {
        self.inner.buffer.clear_ephemeral(id);
    }

    /// Discard persistable changes and any pending rename
    ///
    /// Used on revert and after a successful save. Lossless with respect
    /// to the stored snapshot: afterwards the merged content equals the
    /// stored content again (modulo any ephemeral overlay).
    pub fn clear_changes(&self, id: FileId) {
        self.inner.buffer.clear_changes(id);
    }

    // ------------------------------------------------------------------
    // Merge resolver
    // ------------------------------------------------------------------

    /// Effective content: stored content with the persistable patch, then
    /// the ephemeral overlay, applied in that order
    ///
    /// `None` if the file is not loaded.
    #[must_use]
    pub fn merged_content(&self, id: FileId) -> Option<DocumentContent> {
        let record = self.inner.store.get(id)?;
        let mut content = record.content;
        if let Some(edits) = self.inner.buffer.snapshot(id) {
            // Kind equality is enforced when edits enter the buffer and
            // when snapshots are replaced, so application cannot fail.
            if let Some(patch) = &edits.content {
                patch.apply_to(&mut content).ok();
            }
            if let Some(patch) = &edits.ephemeral {
                patch.apply_to(&mut content).ok();
            }
        }
        Some(content)
    }

    /// The persistable patch for the next save payload, if any
    #[must_use]
    pub fn pending_patch(&self, id: FileId) -> Option<DocumentPatch> {
        self.inner
            .buffer
            .snapshot(id)
            .and_then(|edits| edits.content)
            .filter(|patch| !patch.is_empty())
    }

    /// The full edit snapshot for a file, if anything is buffered
    #[must_use]
    pub fn edits(&self, id: FileId) -> Option<FileEdits> {
        self.inner.buffer.snapshot(id)
    }

    /// True iff the file has unsaved persistable changes (content edits,
    /// or a pending rename that differs from the stored name)
    #[must_use]
    pub fn is_dirty(&self, id: FileId) -> bool {
        let Some(edits) = self.inner.buffer.snapshot(id) else {
            return false;
        };
        if edits.has_content_changes() {
            return true;
        }
        match (&edits.name, self.inner.store.get(id)) {
            (Some(pending), Some(record)) => *pending != record.name,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Pending rename if any, else the stored name
    #[must_use]
    pub fn effective_name(&self, id: FileId) -> Option<String> {
        let edits_name = self
            .inner
            .buffer
            .snapshot(id)
            .and_then(|edits| edits.name);
        match edits_name {
            Some(name) => Some(name),
            None => self.inner.store.get(id).map(|record| record.name),
        }
    }

    fn check_kind(record: &FileRecord, patch: &DocumentPatch) -> Result<(), StateError> {
        if patch.kind() != record.kind {
            return Err(StateError::Document(
                easel_document::DocumentError::KindMismatch {
                    expected: record.kind,
                    actual: patch.kind(),
                },
            ));
        }
        Ok(())
    }
}
