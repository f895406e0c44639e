//! Question content: a saved query plus visualization settings

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Chart rendering for a question's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Raw tabular result
    #[default]
    Table,
    Bar,
    Line,
    Pie,
    /// Single big number
    Number,
}

/// Visualization settings riding on a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Visualization {
    /// Chart family
    pub chart: ChartKind,
    /// Chart-specific settings (axis bindings, colors, formatting)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub settings: IndexMap<String, serde_json::Value>,
}

/// Content payload of a question document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestionContent {
    /// The query text (SQL)
    pub query: String,
    /// Connection the query runs against; `None` = workspace default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// How the result is rendered; `None` = plain table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}
