//! Per-document edit sessions
//!
//! A [`DocumentSession`] wires one open document through the state
//! machine views rely on:
//!
//! - `Viewing` to `Editing` on the first edit or an explicit toggle
//! - `Editing` to `Saving` on save; back to `Viewing` on success, back
//!   to `Editing` with the surfaced message on failure
//! - `Editing` to `Viewing` on revert (buffer discarded, no backend)
//!
//! Transitions happen only through explicit calls; the single implicit
//! rule is that kinds with `auto_edit_on_change` (reports,
//! presentations) enter `Editing` when a dirty change appears while
//! still `Viewing`.

use crate::error::SessionError;
use crate::save::{SaveCoordinator, SaveOutcome};
use easel_client::Backend;
use easel_document::content::DocumentContent;
use easel_document::{DocumentPatch, FileId, FileRecord};
use easel_state::Workbench;
use std::sync::Arc;

/// View-level lifecycle phase of an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    /// Read-only display of merged content
    #[default]
    Viewing,
    /// Unsaved changes may exist; edit affordances shown
    Editing,
    /// A publish is in flight; duplicate saves are refused
    Saving,
}

/// One open document wired to shared state and a backend
pub struct DocumentSession {
    workbench: Workbench,
    backend: Arc<dyn Backend>,
    coordinator: SaveCoordinator,
    file_id: FileId,
    phase: EditPhase,
    last_error: Option<String>,
    selected_run: Option<FileId>,
}

impl DocumentSession {
    /// Open a session for `file_id`
    #[must_use]
    pub fn new(workbench: Workbench, backend: Arc<dyn Backend>, file_id: FileId) -> Self {
        let coordinator = SaveCoordinator::new(workbench.clone(), Arc::clone(&backend));
        Self {
            workbench,
            backend,
            coordinator,
            file_id,
            phase: EditPhase::Viewing,
            last_error: None,
            selected_run: None,
        }
    }

    /// The document this session is for (updated when a draft promotes)
    #[inline]
    #[must_use]
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Current lifecycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Message of the last failed operation, cleared on success/revert
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The run the view currently displays
    #[inline]
    #[must_use]
    pub fn selected_run(&self) -> Option<FileId> {
        self.selected_run
    }

    /// Point the view at a run (client-side state only)
    pub fn select_run(&mut self, run: Option<FileId>) {
        self.selected_run = run;
    }

    /// Merged content for display
    #[must_use]
    pub fn merged_content(&self) -> Option<DocumentContent> {
        self.workbench.merged_content(self.file_id)
    }

    /// Pending rename if any, else the stored name
    #[must_use]
    pub fn effective_name(&self) -> Option<String> {
        self.workbench.effective_name(self.file_id)
    }

    /// True iff unsaved persistable changes exist
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.workbench.is_dirty(self.file_id)
    }

    /// Fetch the snapshot from the backend
    ///
    /// # Errors
    /// Returns [`SessionError::LoadFailed`] and records the message; the
    /// caller owns the retry affordance
    pub async fn load(&mut self) -> Result<FileRecord, SessionError> {
        match self.coordinator.load(self.file_id).await {
            Ok(record) => {
                self.last_error = None;
                Ok(record)
            }
            Err(error) => {
                self.last_error = Some(error.surface_message());
                Err(error)
            }
        }
    }

    /// Enter edit mode explicitly
    pub fn begin_editing(&mut self) {
        if self.phase == EditPhase::Viewing {
            self.phase = EditPhase::Editing;
        }
    }

    /// Buffer a content edit
    ///
    /// Kinds with `auto_edit_on_change` move `Viewing → Editing` as soon
    /// as the change makes the document dirty.
    ///
    /// # Errors
    /// Propagates state-service validation failures; the phase and the
    /// buffer are untouched on error
    pub fn on_change(&mut self, patch: DocumentPatch) -> Result<(), SessionError> {
        self.workbench.edit_content(self.file_id, patch)?;
        self.auto_enter_editing();
        Ok(())
    }

    /// Buffer a rename
    ///
    /// # Errors
    /// Returns [`SessionError::State`] if the file is not loaded
    pub fn on_rename(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        self.workbench.edit_name(self.file_id, name)?;
        self.auto_enter_editing();
        Ok(())
    }

    /// Publish buffered changes
    ///
    /// On success the session follows the canonical record (a promoted
    /// draft updates [`DocumentSession::file_id`]) and returns to
    /// `Viewing`; on failure the buffer is intact, the surfaced message
    /// is recorded, and the session stays in `Editing`.
    ///
    /// # Errors
    /// See [`SaveCoordinator::publish`]
    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        if self.phase == EditPhase::Saving {
            return Err(SessionError::SaveInFlight(self.file_id));
        }
        self.phase = EditPhase::Saving;
        match self.coordinator.publish(self.file_id).await {
            Ok(outcome) => {
                self.file_id = outcome.file.id;
                self.phase = EditPhase::Viewing;
                self.last_error = None;
                Ok(outcome)
            }
            Err(error) => {
                self.phase = EditPhase::Editing;
                self.last_error = Some(error.surface_message());
                Err(error)
            }
        }
    }

    /// Discard buffered changes and exit edit mode; the backend is not
    /// contacted
    pub fn revert(&mut self) {
        self.coordinator.revert(self.file_id);
        self.phase = EditPhase::Viewing;
        self.last_error = None;
    }

    /// Test the merged connection definition without saving it
    ///
    /// # Errors
    /// - [`SessionError::Validation`] if the merged content fails local
    ///   validation (nothing is sent)
    /// - [`SessionError::SaveFailed`] if the backend rejects the probe
    pub async fn test_connection(&mut self) -> Result<(), SessionError> {
        let content = self
            .merged_content()
            .ok_or(SessionError::NotLoaded(self.file_id))?;
        let connection = match content {
            DocumentContent::Connection(connection) => connection,
            other => return Err(SessionError::NotTestable(other.kind())),
        };
        connection.validate()?;
        match self.backend.test_connection(&connection).await {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                let error = SessionError::save_failed(error);
                self.last_error = Some(error.surface_message());
                Err(error)
            }
        }
    }

    fn auto_enter_editing(&mut self) {
        if self.phase == EditPhase::Viewing && self.is_dirty() {
            let auto = self
                .workbench
                .file(self.file_id)
                .map(|record| record.kind.auto_edit_on_change())
                .unwrap_or(false);
            if auto {
                self.phase = EditPhase::Editing;
            }
        }
    }
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("file_id", &self.file_id)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
