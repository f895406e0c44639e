//! Run execution
//!
//! [`RunExecutor`] invokes the backend agent to execute a report or
//! alert, persists the outcome as an immutable run-log file under the
//! parent's log path, and lists past runs newest-first.
//!
//! Client-side guards, mirrored nowhere server-side:
//! - runs are refused while the parent document is dirty (save first)
//! - one run per document at a time, with an abort handle per in-flight
//!   run

use crate::error::SessionError;
use easel_client::{AgentInvocation, Backend, ConversationId, FileQuery, PublishRequest};
use easel_document::content::DocumentContent;
use easel_document::run::{run_file_name, run_log_path, RunRecord, RunTrigger};
use easel_document::{DocumentKind, DraftIds, FileId, FileRecord};
use easel_state::Workbench;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;

/// Agent executing report bodies
pub const REPORT_AGENT: &str = "report_runner";

/// Agent checking alert conditions
pub const ALERT_AGENT: &str = "alert_checker";

/// Executes report runs and alert checks
pub struct RunExecutor {
    workbench: Workbench,
    backend: Arc<dyn Backend>,
    drafts: DraftIds,
    in_flight: DashMap<FileId, AbortHandle>,
}

impl RunExecutor {
    /// Create an executor over shared state and a backend handle
    #[must_use]
    pub fn new(workbench: Workbench, backend: Arc<dyn Backend>) -> Self {
        Self {
            workbench,
            backend,
            drafts: DraftIds::new(),
            in_flight: DashMap::new(),
        }
    }

    /// Execute a report now ("Run Now")
    ///
    /// # Errors
    /// See [`RunExecutor::execute`]
    pub async fn run_now(&self, parent: FileId) -> Result<FileRecord, SessionError> {
        self.execute(parent, DocumentKind::Report).await
    }

    /// Check an alert now ("Check Now")
    ///
    /// # Errors
    /// See [`RunExecutor::execute`]
    pub async fn check_now(&self, parent: FileId) -> Result<FileRecord, SessionError> {
        self.execute(parent, DocumentKind::Alert).await
    }

    /// True while a run is in flight for `parent`
    #[must_use]
    pub fn is_running(&self, parent: FileId) -> bool {
        self.in_flight.contains_key(&parent)
    }

    /// Abort the in-flight run for `parent`, if any
    ///
    /// Returns whether a run was aborted. The backend task keeps running
    /// server-side; this is the client-side stop signal only.
    pub fn cancel(&self, parent: FileId) -> bool {
        match self.in_flight.get(&parent) {
            Some(handle) => {
                tracing::info!(%parent, "aborting in-flight run");
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Past runs for `parent`, newest first
    ///
    /// # Errors
    /// Returns [`SessionError::LoadFailed`] if the listing fails
    pub async fn runs(&self, parent: FileId) -> Result<Vec<FileRecord>, SessionError> {
        let mut records = self
            .backend
            .list_files(FileQuery::under_path(run_log_path(parent)).with_kind(DocumentKind::RunLog))
            .await
            .map_err(SessionError::load_failed)?;
        records.sort_by_key(|record| std::cmp::Reverse(run_started_at(record)));
        Ok(records)
    }

    /// Execute the parent document through the matching agent
    ///
    /// # Errors
    /// - [`SessionError::NotLoaded`] / [`SessionError::NotRunnable`] on
    ///   precondition failures
    /// - [`SessionError::DirtyDocument`] while unsaved changes exist
    /// - [`SessionError::RunInFlight`] while another run is active
    /// - [`SessionError::RunCancelled`] when aborted via
    ///   [`RunExecutor::cancel`]
    /// - [`SessionError::RunFailed`] when the agent cannot be reached;
    ///   agent-side task failures are recorded as failed runs instead
    async fn execute(
        &self,
        parent: FileId,
        expected_kind: DocumentKind,
    ) -> Result<FileRecord, SessionError> {
        let record = self
            .workbench
            .file(parent)
            .ok_or(SessionError::NotLoaded(parent))?;
        if record.kind != expected_kind || !record.kind.is_runnable() {
            return Err(SessionError::NotRunnable(record.kind));
        }
        if self.workbench.is_dirty(parent) {
            return Err(SessionError::DirtyDocument(parent));
        }

        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        {
            use dashmap::mapref::entry::Entry;
            match self.in_flight.entry(parent) {
                Entry::Occupied(_) => return Err(SessionError::RunInFlight(parent)),
                Entry::Vacant(vacant) => {
                    vacant.insert(abort_handle);
                }
            }
        }
        let _guard = InFlightGuard {
            registry: &self.in_flight,
            id: parent,
        };

        let agent = match record.kind {
            DocumentKind::Report => REPORT_AGENT,
            _ => ALERT_AGENT,
        };
        let started_at = Utc::now();
        tracing::info!(%parent, agent, "starting run");

        let work = Abortable::new(
            self.perform(parent, agent, started_at),
            abort_registration,
        );
        match work.await {
            Ok(outcome) => outcome,
            Err(_aborted) => Err(SessionError::RunCancelled),
        }
    }

    // Invoke the agent, read the task result out of the conversation
    // log, persist the run record under the parent's log path.
    async fn perform(
        &self,
        parent: FileId,
        agent: &str,
        started_at: DateTime<Utc>,
    ) -> Result<FileRecord, SessionError> {
        let invocation =
            AgentInvocation::new(agent, serde_json::json!({ "file_id": parent.raw() }));
        let conversation = match self.backend.invoke_agent(invocation).await {
            Ok(conversation) => conversation,
            Err(error) => {
                // No conversation exists, so there is no run to record.
                tracing::warn!(%parent, %error, "agent invocation failed");
                return Err(SessionError::RunFailed {
                    message: error.surface_message(),
                });
            }
        };

        let run = match self.read_task_result(&conversation).await {
            Some(result) if result.success => RunRecord::succeeded(
                parent,
                RunTrigger::Manual,
                started_at,
                result.output,
                Some(conversation.as_str().to_string()),
            ),
            Some(result) => RunRecord::failed(
                parent,
                RunTrigger::Manual,
                started_at,
                result.error.unwrap_or_else(|| "task failed".to_string()),
                Some(conversation.as_str().to_string()),
            ),
            None => RunRecord::failed(
                parent,
                RunTrigger::Manual,
                started_at,
                "no task result recorded",
                Some(conversation.as_str().to_string()),
            ),
        };

        let request = PublishRequest {
            id: self.drafts.allocate(),
            name: run_file_name(started_at),
            path: run_log_path(parent),
            kind: DocumentKind::RunLog,
            content: DocumentContent::RunLog(run),
            base_revision: None,
        };
        let stored = self
            .backend
            .publish_file(request)
            .await
            .map_err(|error| SessionError::RunFailed {
                message: error.surface_message(),
            })?;
        self.workbench.set_file(stored.clone());
        tracing::info!(%parent, run = %stored.id, "run recorded");
        Ok(stored)
    }

    async fn read_task_result(
        &self,
        conversation: &ConversationId,
    ) -> Option<easel_document::content::TaskResult> {
        let records = self
            .backend
            .list_files(
                FileQuery::under_path(conversation.file_path())
                    .with_kind(DocumentKind::Conversation),
            )
            .await
            .ok()?;
        let record = records.into_iter().next()?;
        match record.content {
            DocumentContent::Conversation(log) => log.task_result(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RunExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunExecutor")
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

struct InFlightGuard<'a> {
    registry: &'a DashMap<FileId, AbortHandle>,
    id: FileId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

fn run_started_at(record: &FileRecord) -> DateTime<Utc> {
    match &record.content {
        DocumentContent::RunLog(run) => run.started_at,
        _ => DateTime::<Utc>::MIN_UTC,
    }
}
