//! Per-kind content payloads
//!
//! [`DocumentContent`] is the tagged union over every payload the
//! workbench understands. Views never mutate content directly; they buffer
//! typed patches that are merged over these payloads.

pub mod alert;
pub mod connection;
pub mod conversation;
pub mod dashboard;
pub mod presentation;
pub mod question;
pub mod report;

pub use alert::{AlertContent, Condition, ConditionFunction, ConditionOperator, ConditionSelector};
pub use connection::{ConnectionContent, ConnectionDriver};
pub use conversation::{ConversationContent, LogEntry, LogEntryKind, TaskResult};
pub use dashboard::{
    generate_default_layout, DashboardAsset, DashboardContent, GridLayout, LayoutItem,
    DEFAULT_TILE_SPAN, GRID_COLUMNS,
};
pub use presentation::{PresentationContent, Slide};
pub use question::{ChartKind, QuestionContent, Visualization};
pub use report::{ReportContent, Schedule};

use crate::error::DocumentError;
use crate::kind::DocumentKind;
use crate::run::RunRecord;
use serde::{Deserialize, Serialize};

/// Type-specific content of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentContent {
    Question(QuestionContent),
    Dashboard(DashboardContent),
    Report(ReportContent),
    Alert(AlertContent),
    Presentation(PresentationContent),
    Connection(ConnectionContent),
    RunLog(RunRecord),
    Conversation(ConversationContent),
}

impl DocumentContent {
    /// The kind this payload belongs to
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Question(_) => DocumentKind::Question,
            Self::Dashboard(_) => DocumentKind::Dashboard,
            Self::Report(_) => DocumentKind::Report,
            Self::Alert(_) => DocumentKind::Alert,
            Self::Presentation(_) => DocumentKind::Presentation,
            Self::Connection(_) => DocumentKind::Connection,
            Self::RunLog(_) => DocumentKind::RunLog,
            Self::Conversation(_) => DocumentKind::Conversation,
        }
    }

    /// Empty payload for a new draft of `kind`
    ///
    /// Returns `None` for [`DocumentKind::RunLog`]: run records are only
    /// ever created from a finished execution, never drafted.
    #[must_use]
    pub fn default_for(kind: DocumentKind) -> Option<Self> {
        match kind {
            DocumentKind::Question => Some(Self::Question(QuestionContent::default())),
            DocumentKind::Dashboard => Some(Self::Dashboard(DashboardContent::default())),
            DocumentKind::Report => Some(Self::Report(ReportContent::default())),
            DocumentKind::Alert => None,
            DocumentKind::Presentation => Some(Self::Presentation(PresentationContent::default())),
            DocumentKind::Connection => None,
            DocumentKind::RunLog => None,
            DocumentKind::Conversation => Some(Self::Conversation(ConversationContent::default())),
        }
    }

    /// Typed validation of the payload
    ///
    /// # Errors
    /// Returns the first validation failure
    pub fn validate(&self) -> Result<(), DocumentError> {
        match self {
            Self::Alert(alert) => alert.condition.validate(),
            Self::Connection(connection) => connection.validate(),
            Self::Dashboard(dashboard) => match &dashboard.layout {
                Some(layout) => layout.validate(),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
