//! Testing utilities for the Easel workspace
//!
//! Shared fixtures and an in-memory [`Backend`] honouring the same
//! contract as the HTTP implementation: draft promotion, revision
//! conflicts, scripted agent results, and scripted failures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use easel_client::{
    AccessToken, AgentInvocation, ApiError, Backend, ConversationId, FileQuery, PublishRequest,
};
use easel_document::content::{
    AlertContent, Condition, ConditionFunction, ConditionOperator, ConditionSelector,
    ConnectionContent, ConversationContent, LogEntry, LogEntryKind, QuestionContent,
    ReportContent, TaskResult,
};
use easel_document::{DocumentContent, DocumentKind, FileId, FileRecord};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};

/// Initialise test tracing once (respects `RUST_LOG`)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ----------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------

pub fn question_record(raw_id: i64, name: &str, query: &str) -> FileRecord {
    FileRecord::new(
        FileId::new(raw_id).unwrap(),
        name,
        "/questions",
        DocumentKind::Question,
        DocumentContent::Question(QuestionContent {
            query: query.to_string(),
            ..QuestionContent::default()
        }),
        Utc::now(),
    )
    .unwrap()
}

pub fn report_record(raw_id: i64, name: &str, body: &str) -> FileRecord {
    FileRecord::new(
        FileId::new(raw_id).unwrap(),
        name,
        "/reports",
        DocumentKind::Report,
        DocumentContent::Report(ReportContent {
            body: body.to_string(),
            ..ReportContent::default()
        }),
        Utc::now(),
    )
    .unwrap()
}

pub fn alert_record(raw_id: i64, name: &str, question_id: i64, threshold: f64) -> FileRecord {
    FileRecord::new(
        FileId::new(raw_id).unwrap(),
        name,
        "/alerts",
        DocumentKind::Alert,
        DocumentContent::Alert(AlertContent {
            question_id: FileId::new(question_id).unwrap(),
            condition: Condition {
                function: ConditionFunction::Count,
                selector: ConditionSelector::All,
                operator: ConditionOperator::Above,
                threshold,
            },
            schedule: None,
        }),
        Utc::now(),
    )
    .unwrap()
}

pub fn success_result(output: &str) -> TaskResult {
    TaskResult {
        success: true,
        output: Some(output.to_string()),
        error: None,
    }
}

pub fn failure_result(error: &str) -> TaskResult {
    TaskResult {
        success: false,
        output: None,
        error: Some(error.to_string()),
    }
}

// ----------------------------------------------------------------------
// In-memory backend
// ----------------------------------------------------------------------

/// In-memory document service
///
/// Promotes drafts to sequential positive ids, enforces base-revision
/// checks on update, and materialises one conversation file per agent
/// invocation carrying the next scripted [`TaskResult`].
#[derive(Debug)]
pub struct InMemoryBackend {
    files: DashMap<FileId, FileRecord>,
    tokens: DashMap<String, AccessToken>,
    next_id: AtomicI64,
    agent_results: Mutex<VecDeque<TaskResult>>,
    fail_next_publish: Mutex<Option<ApiError>>,
    fail_next_agent: Mutex<Option<ApiError>>,
    invocations: Mutex<Vec<AgentInvocation>>,
    publishes: Mutex<Vec<PublishRequest>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
            tokens: DashMap::new(),
            next_id: AtomicI64::new(1),
            agent_results: Mutex::new(VecDeque::new()),
            fail_next_publish: Mutex::new(None),
            fail_next_agent: Mutex::new(None),
            invocations: Mutex::new(Vec::new()),
            publishes: Mutex::new(Vec::new()),
        }
    }

    /// Seed a persisted file
    pub fn seed(&self, record: FileRecord) {
        let raw = record.id.raw();
        if raw >= self.next_id.load(Ordering::Relaxed) {
            self.next_id.store(raw + 1, Ordering::Relaxed);
        }
        self.files.insert(record.id, record);
    }

    /// Queue the task result returned by the next agent invocation
    pub fn push_agent_result(&self, result: TaskResult) {
        self.agent_results.lock().push_back(result);
    }

    /// Make the next publish fail with `error`
    pub fn fail_next_publish(&self, error: ApiError) {
        *self.fail_next_publish.lock() = Some(error);
    }

    /// Make the next agent invocation fail with `error`
    pub fn fail_next_agent(&self, error: ApiError) {
        *self.fail_next_agent.lock() = Some(error);
    }

    /// Every publish request received, in order
    pub fn publishes(&self) -> Vec<PublishRequest> {
        self.publishes.lock().clone()
    }

    /// Every agent invocation received, in order
    pub fn invocations(&self) -> Vec<AgentInvocation> {
        self.invocations.lock().clone()
    }

    /// Direct read of a stored file
    pub fn stored(&self, id: FileId) -> Option<FileRecord> {
        self.files.get(&id).map(|entry| entry.clone())
    }

    fn allocate_id(&self) -> FileId {
        FileId::new(self.next_id.fetch_add(1, Ordering::Relaxed)).unwrap()
    }

    fn not_found(id: FileId) -> ApiError {
        ApiError::NotFound {
            message: format!("file {id} does not exist"),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_files(&self, query: FileQuery) -> Result<Vec<FileRecord>, ApiError> {
        let mut records: Vec<FileRecord> = self
            .files
            .iter()
            .map(|entry| entry.clone())
            .filter(|record| query.paths.is_empty() || query.paths.contains(&record.path))
            .filter(|record| query.kind.is_none() || query.kind == Some(record.kind))
            .collect();
        records.sort_by(|a, b| (&a.path, &a.name).cmp(&(&b.path, &b.name)));
        Ok(records)
    }

    async fn fetch_file(&self, id: FileId) -> Result<FileRecord, ApiError> {
        self.stored(id).ok_or_else(|| Self::not_found(id))
    }

    async fn publish_file(&self, request: PublishRequest) -> Result<FileRecord, ApiError> {
        if let Some(error) = self.fail_next_publish.lock().take() {
            return Err(error);
        }
        self.publishes.lock().push(request.clone());

        let id = if request.id.is_virtual() {
            self.allocate_id()
        } else {
            let existing = self
                .stored(request.id)
                .ok_or_else(|| Self::not_found(request.id))?;
            let stored_revision = existing
                .revision()
                .map_err(|e| ApiError::Http {
                    status: 500,
                    message: e.to_string(),
                })?;
            match request.base_revision {
                Some(base) if base == stored_revision => {}
                _ => {
                    return Err(ApiError::Conflict {
                        message: format!(
                            "expected revision {}, got {:?}",
                            stored_revision.short(),
                            request.base_revision.map(|r| r.short())
                        ),
                    })
                }
            }
            request.id
        };

        let record = FileRecord::new(
            id,
            request.name,
            request.path,
            request.kind,
            request.content,
            Utc::now(),
        )
        .map_err(|e| ApiError::UserFacing {
            message: e.to_string(),
        })?;
        self.files.insert(id, record.clone());
        Ok(record)
    }

    async fn move_file(&self, id: FileId, new_path: &str) -> Result<FileRecord, ApiError> {
        let mut entry = self.files.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        entry.path = new_path.to_string();
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete_file(&self, id: FileId) -> Result<(), ApiError> {
        self.files
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn invoke_agent(
        &self,
        invocation: AgentInvocation,
    ) -> Result<ConversationId, ApiError> {
        if let Some(error) = self.fail_next_agent.lock().take() {
            return Err(error);
        }
        self.invocations.lock().push(invocation);

        let result = self
            .agent_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| success_result("ok"));
        let conversation = ConversationId(uuid::Uuid::new_v4().to_string());

        let log = ConversationContent {
            entries: vec![LogEntry {
                kind: LogEntryKind::TaskResult,
                payload: serde_json::to_value(&result).unwrap_or_default(),
                at: Utc::now(),
            }],
        };
        let record = FileRecord::new(
            self.allocate_id(),
            "log",
            conversation.file_path(),
            DocumentKind::Conversation,
            DocumentContent::Conversation(log),
            Utc::now(),
        )
        .unwrap();
        self.files.insert(record.id, record);

        Ok(conversation)
    }

    async fn test_connection(&self, connection: &ConnectionContent) -> Result<(), ApiError> {
        connection.validate().map_err(|e| ApiError::UserFacing {
            message: e.to_string(),
        })
    }

    async fn create_access_token(&self, file_id: FileId) -> Result<AccessToken, ApiError> {
        if !self.files.contains_key(&file_id) {
            return Err(Self::not_found(file_id));
        }
        let token = AccessToken {
            id: uuid::Uuid::new_v4().to_string(),
            token: uuid::Uuid::new_v4().to_string(),
            file_id,
            created_at: Utc::now(),
        };
        self.tokens.insert(token.id.clone(), token.clone());
        Ok(token)
    }

    async fn revoke_access_token(&self, token_id: &str) -> Result<(), ApiError> {
        self.tokens
            .remove(token_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound {
                message: format!("token {token_id} does not exist"),
            })
    }
}
