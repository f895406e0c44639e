//! Wire types for the document service

use chrono::{DateTime, Utc};
use easel_document::{ContentRevision, DocumentContent, DocumentKind, FileId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Query for listing files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    /// Folder paths to list (exact match per path)
    pub paths: Vec<String>,
    /// Restrict to one document kind
    pub kind: Option<DocumentKind>,
    /// Whether full content payloads are returned
    pub include_content: bool,
}

impl FileQuery {
    /// Query for everything under one path, with content
    #[must_use]
    pub fn under_path(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            ..Self::default()
        }
    }

    /// Restrict to one kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Query-string pairs for the list endpoint
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if !self.paths.is_empty() {
            pairs.push(("paths", self.paths.join(",")));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }
        pairs.push(("includeContent", self.include_content.to_string()));
        pairs
    }
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            kind: None,
            include_content: true,
        }
    }
}

/// Create/update request for the publish endpoint
///
/// `base_revision` is `None` exactly when the id is virtual (first
/// publish); for updates it carries the revision of the last-loaded
/// snapshot, and the backend rejects the publish with a conflict when it
/// no longer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Current client-side id (negative for drafts)
    pub id: FileId,
    /// Effective name (pending rename already applied)
    pub name: String,
    /// Folder path
    pub path: String,
    /// Document kind
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Full merged persistable content
    pub content: DocumentContent,
    /// Optimistic-concurrency token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_revision: Option<ContentRevision>,
}

/// Body of a move request (`PATCH /api/documents/{id}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// New folder path
    pub path: String,
}

/// An agent invocation (`POST /api/chat`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInvocation {
    /// Agent name, e.g. `report_runner`
    pub agent: String,
    /// Agent-specific arguments
    pub agent_args: serde_json::Value,
}

impl AgentInvocation {
    /// Invoke `agent` with `agent_args`
    #[must_use]
    pub fn new(agent: impl Into<String>, agent_args: serde_json::Value) -> Self {
        Self {
            agent: agent.into(),
            agent_args,
        }
    }
}

/// Identifier of an agent conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the conversation file holding this conversation's log
    #[must_use]
    pub fn file_path(&self) -> String {
        format!("/conversations/{}", self.0)
    }
}

impl Display for ConversationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Conversation created for the invocation
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,
}

/// Request to create a public share token (admin-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRequest {
    /// File the token grants read access to
    pub file_id: FileId,
}

/// A public share token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Token identity (used for revocation)
    pub id: String,
    /// Opaque token value embedded in share links
    pub token: String,
    /// File the token grants read access to
    pub file_id: FileId,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Error body shape returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct ErrorDetail {
    pub(crate) kind: String,
    pub(crate) message: String,
}
