//! Save coordination
//!
//! [`SaveCoordinator`] commits buffered persistable changes to the
//! backend and reconciles local state with the canonical result. The
//! change buffer is cleared only after a successful publish; a rejected
//! save leaves every buffered field in place for retry or revert.

use crate::error::SessionError;
use easel_client::{Backend, PublishRequest};
use easel_document::{FileId, FileRecord};
use easel_state::Workbench;
use std::sync::Arc;

/// Result of a successful publish
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Canonical record returned by the backend; now the stored snapshot
    pub file: FileRecord,
    /// Canonical URL to navigate to when the id or slug changed
    pub navigate_to: Option<String>,
}

/// Commits buffered changes and reconciles the workbench
#[derive(Clone)]
pub struct SaveCoordinator {
    workbench: Workbench,
    backend: Arc<dyn Backend>,
}

impl SaveCoordinator {
    /// Create a coordinator over shared state and a backend handle
    #[must_use]
    pub fn new(workbench: Workbench, backend: Arc<dyn Backend>) -> Self {
        Self { workbench, backend }
    }

    /// Publish a file's buffered persistable changes
    ///
    /// The payload is the stored content with the persistable patch
    /// applied; the ephemeral overlay never leaves the process. For
    /// persisted ids the request carries the snapshot's revision as the
    /// optimistic-concurrency base; drafts send none and are promoted to
    /// a real id by the backend.
    ///
    /// # Errors
    /// - [`SessionError::NotLoaded`] without a snapshot
    /// - [`SessionError::Validation`] if the merged payload fails typed
    ///   validation (local, nothing is sent)
    /// - [`SessionError::SaveFailed`] on rejection; the buffer is intact
    pub async fn publish(&self, id: FileId) -> Result<SaveOutcome, SessionError> {
        let record = self
            .workbench
            .file(id)
            .ok_or(SessionError::NotLoaded(id))?;

        let mut content = record.content.clone();
        if let Some(patch) = self.workbench.pending_patch(id) {
            patch.apply_to(&mut content)?;
        }
        content.validate()?;

        let name = self
            .workbench
            .effective_name(id)
            .unwrap_or_else(|| record.name.clone());
        let base_revision = if id.is_virtual() {
            None
        } else {
            Some(record.revision()?)
        };

        let request = PublishRequest {
            id,
            name,
            path: record.path.clone(),
            kind: record.kind,
            content,
            base_revision,
        };

        let canonical = match self.backend.publish_file(request).await {
            Ok(canonical) => canonical,
            Err(error) => {
                tracing::warn!(%id, %error, "publish rejected; buffer preserved");
                return Err(SessionError::save_failed(error));
            }
        };

        let id_changed = canonical.id != id;
        let slug_changed = canonical.slug() != record.slug();
        if id_changed {
            // Draft promoted: the virtual snapshot and its buffers are
            // superseded by the canonical record.
            self.workbench.remove_file(id);
        }
        self.workbench.set_file(canonical.clone());
        self.workbench.clear_changes(canonical.id);

        let navigate_to = (id_changed || slug_changed).then(|| canonical.canonical_url());
        tracing::info!(
            old_id = %id,
            new_id = %canonical.id,
            navigating = navigate_to.is_some(),
            "publish succeeded"
        );
        Ok(SaveOutcome {
            file: canonical,
            navigate_to,
        })
    }

    /// Discard buffered changes without contacting the backend
    pub fn revert(&self, id: FileId) {
        tracing::debug!(%id, "reverting buffered changes");
        self.workbench.clear_changes(id);
    }

    /// Fetch a file and store the snapshot
    ///
    /// # Errors
    /// Returns [`SessionError::LoadFailed`]; no automatic retry
    pub async fn load(&self, id: FileId) -> Result<FileRecord, SessionError> {
        let record = self
            .backend
            .fetch_file(id)
            .await
            .map_err(SessionError::load_failed)?;
        self.workbench.set_file(record.clone());
        Ok(record)
    }

    /// Move a file to a new folder path and reconcile the snapshot
    ///
    /// # Errors
    /// Returns [`SessionError::SaveFailed`] on rejection
    pub async fn move_to(&self, id: FileId, new_path: &str) -> Result<FileRecord, SessionError> {
        let record = self
            .backend
            .move_file(id, new_path)
            .await
            .map_err(SessionError::save_failed)?;
        self.workbench.set_file(record.clone());
        Ok(record)
    }

    /// Delete a file and drop it from local state
    ///
    /// # Errors
    /// Returns [`SessionError::SaveFailed`] on rejection
    pub async fn delete(&self, id: FileId) -> Result<(), SessionError> {
        self.backend
            .delete_file(id)
            .await
            .map_err(SessionError::save_failed)?;
        self.workbench.remove_file(id);
        Ok(())
    }
}

impl std::fmt::Debug for SaveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveCoordinator").finish_non_exhaustive()
    }
}
