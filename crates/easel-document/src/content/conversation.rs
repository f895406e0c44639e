//! Conversation content: an agent conversation transcript
//!
//! Agent invocations return a conversation id; the outcome of the task is
//! retrieved later by loading the conversation file and scanning its log
//! for the latest `task_result` entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a conversation log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryKind {
    UserMessage,
    AgentMessage,
    ToolCall,
    TaskResult,
}

/// One entry in a conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry kind
    pub kind: LogEntryKind,
    /// Entry-specific payload
    pub payload: serde_json::Value,
    /// When the entry was appended
    pub at: DateTime<Utc>,
}

/// Outcome of an agent task, carried in a `task_result` log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Whether the task succeeded
    pub success: bool,
    /// Task output on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failure description on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Content payload of a conversation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversationContent {
    /// Append-only log entries, oldest first
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl ConversationContent {
    /// Latest task result in the log, if the task has finished
    #[must_use]
    pub fn task_result(&self) -> Option<TaskResult> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.kind == LogEntryKind::TaskResult)
            .and_then(|entry| serde_json::from_value(entry.payload.clone()).ok())
    }
}
