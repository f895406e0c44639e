//! Run records
//!
//! One execution of a report or alert produces a [`RunRecord`], stored as
//! its own `run_log` file under the parent's log path. Runs are append-only
//! and immutable once written; only the view-side "selected run" pointer is
//! mutable client state.

use crate::id::FileId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root path for run log files
pub const RUN_LOG_ROOT: &str = "/logs";

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// What started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    /// "Run Now" / "Check Now" in a view
    Manual,
    /// Backend schedule
    Scheduled,
}

/// An immutable execution record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// The report or alert that was executed
    pub parent: FileId,
    /// What started the run
    pub trigger: RunTrigger,
    /// Outcome
    pub status: RunStatus,
    /// Execution start
    pub started_at: DateTime<Utc>,
    /// Execution end
    pub finished_at: DateTime<Utc>,
    /// Agent output on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Conversation that produced the result, if the agent was reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
}

impl RunRecord {
    /// Record a successful run
    #[must_use]
    pub fn succeeded(
        parent: FileId,
        trigger: RunTrigger,
        started_at: DateTime<Utc>,
        output: Option<String>,
        conversation: Option<String>,
    ) -> Self {
        Self {
            parent,
            trigger,
            status: RunStatus::Succeeded,
            started_at,
            finished_at: Utc::now(),
            output,
            error: None,
            conversation,
        }
    }

    /// Record a failed run
    #[must_use]
    pub fn failed(
        parent: FileId,
        trigger: RunTrigger,
        started_at: DateTime<Utc>,
        error: impl Into<String>,
        conversation: Option<String>,
    ) -> Self {
        Self {
            parent,
            trigger,
            status: RunStatus::Failed,
            started_at,
            finished_at: Utc::now(),
            output: None,
            error: Some(error.into()),
            conversation,
        }
    }

    /// True for failed runs
    #[inline]
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.status, RunStatus::Failed)
    }
}

/// Log directory for a parent document's runs
#[must_use]
pub fn run_log_path(parent: FileId) -> String {
    format!("{RUN_LOG_ROOT}/{}", parent.raw())
}

/// File name for a run, derived from its start time
#[must_use]
pub fn run_file_name(started_at: DateTime<Utc>) -> String {
    format!("run-{}", started_at.format("%Y%m%dT%H%M%S%.3fZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_log_path_keyed_by_parent() {
        let parent = FileId::new(42).unwrap();
        assert_eq!(run_log_path(parent), "/logs/42");
    }

    #[test]
    fn run_file_name_sorts_by_start_time() {
        let early = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        assert!(run_file_name(early) < run_file_name(late));
    }

    #[test]
    fn failed_run_records_error() {
        let parent = FileId::new(7).unwrap();
        let run = RunRecord::failed(parent, RunTrigger::Manual, Utc::now(), "agent timeout", None);
        assert!(run.is_failure());
        assert_eq!(run.error.as_deref(), Some("agent timeout"));
        assert!(run.output.is_none());
    }

    #[test]
    fn succeeded_run_has_no_error() {
        let parent = FileId::new(7).unwrap();
        let run = RunRecord::succeeded(
            parent,
            RunTrigger::Manual,
            Utc::now(),
            Some("3 rows".to_string()),
            Some("conv-1".to_string()),
        );
        assert!(!run.is_failure());
        assert!(run.error.is_none());
    }
}
