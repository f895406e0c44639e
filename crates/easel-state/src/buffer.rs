//! Change buffer
//!
//! Per-file accumulation of uncommitted edits, separated into persistable
//! changes (saved on publish), ephemeral changes (view-only overlays that
//! never leave the process), and a pending rename.

use dashmap::DashMap;
use easel_document::{DocumentError, DocumentPatch, FileId};

/// Uncommitted edits for one file
#[derive(Debug, Clone, Default)]
pub struct FileEdits {
    /// Accumulated persistable patch; part of the next save payload
    pub content: Option<DocumentPatch>,
    /// View-only overlay; merged for display, never saved
    pub ephemeral: Option<DocumentPatch>,
    /// Pending rename
    pub name: Option<String>,
}

impl FileEdits {
    /// True if the persistable patch carries at least one field
    #[must_use]
    pub fn has_content_changes(&self) -> bool {
        self.content.as_ref().is_some_and(|patch| !patch.is_empty())
    }
}

/// Concurrent map of per-file edits
#[derive(Debug, Default)]
pub(crate) struct ChangeBuffer {
    edits: DashMap<FileId, FileEdits>,
}

impl ChangeBuffer {
    pub(crate) fn new() -> Self {
        Self {
            edits: DashMap::new(),
        }
    }

    /// Fold a patch into the persistable buffer (last write wins per field)
    pub(crate) fn edit_content(
        &self,
        id: FileId,
        patch: DocumentPatch,
    ) -> Result<(), DocumentError> {
        let mut entry = self.edits.entry(id).or_default();
        match &mut entry.content {
            Some(buffered) => buffered.merge(patch)?,
            slot @ None => *slot = Some(patch),
        }
        Ok(())
    }

    /// Record a pending rename
    pub(crate) fn edit_name(&self, id: FileId, name: String) {
        self.edits.entry(id).or_default().name = Some(name);
    }

    /// Fold a patch into the ephemeral overlay
    pub(crate) fn set_ephemeral(
        &self,
        id: FileId,
        patch: DocumentPatch,
    ) -> Result<(), DocumentError> {
        let mut entry = self.edits.entry(id).or_default();
        match &mut entry.ephemeral {
            Some(buffered) => buffered.merge(patch)?,
            slot @ None => *slot = Some(patch),
        }
        Ok(())
    }

    /// Drop the ephemeral overlay only
    pub(crate) fn clear_ephemeral(&self, id: FileId) {
        if let Some(mut entry) = self.edits.get_mut(&id) {
            entry.ephemeral = None;
        }
        self.prune(id);
    }

    /// Drop persistable changes and the pending rename (revert /
    /// successful save); the ephemeral overlay survives
    pub(crate) fn clear_changes(&self, id: FileId) {
        if let Some(mut entry) = self.edits.get_mut(&id) {
            entry.content = None;
            entry.name = None;
        }
        self.prune(id);
    }

    /// Drop everything buffered for the file
    pub(crate) fn clear_all(&self, id: FileId) {
        self.edits.remove(&id);
    }

    /// Snapshot of the file's edits; `None` when nothing is buffered
    pub(crate) fn snapshot(&self, id: FileId) -> Option<FileEdits> {
        self.edits.get(&id).map(|entry| entry.clone())
    }

    // An entry holding no edits at all is indistinguishable from no entry;
    // drop it so `snapshot` stays `None` for untouched files.
    fn prune(&self, id: FileId) {
        self.edits.remove_if(&id, |_, edits| {
            edits.content.is_none() && edits.ephemeral.is_none() && edits.name.is_none()
        });
    }
}
