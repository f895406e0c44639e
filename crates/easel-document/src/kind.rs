//! Document kinds
//!
//! The fixed set of document types the workbench understands. Views are
//! dispatched over this enum, never over class hierarchies.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The kind of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A saved query plus visualization settings
    Question,
    /// A grid of question/text tiles
    Dashboard,
    /// A narrative document executed by the agent on demand or schedule
    Report,
    /// A condition checked against a question's result
    Alert,
    /// A slide deck referencing other documents
    Presentation,
    /// A database connection definition
    Connection,
    /// An immutable execution record of a report or alert
    RunLog,
    /// An agent conversation transcript
    Conversation,
}

impl DocumentKind {
    /// All kinds, in display order
    pub const ALL: [DocumentKind; 8] = [
        Self::Question,
        Self::Dashboard,
        Self::Report,
        Self::Alert,
        Self::Presentation,
        Self::Connection,
        Self::RunLog,
        Self::Conversation,
    ];

    /// Stable string identifier (matches the wire `type` field)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Dashboard => "dashboard",
            Self::Report => "report",
            Self::Alert => "alert",
            Self::Presentation => "presentation",
            Self::Connection => "connection",
            Self::RunLog => "run_log",
            Self::Conversation => "conversation",
        }
    }

    /// Kinds that can be executed as a run ("Run Now" / "Check Now")
    #[inline]
    #[must_use]
    pub const fn is_runnable(self) -> bool {
        matches!(self, Self::Report | Self::Alert)
    }

    /// Kinds whose views enter edit mode implicitly when a dirty change
    /// appears while still viewing
    #[inline]
    #[must_use]
    pub const fn auto_edit_on_change(self) -> bool {
        matches!(self, Self::Report | Self::Presentation)
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownKind(s.to_string()))
    }
}
