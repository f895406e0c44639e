//! Presentation content: a slide deck referencing other documents

use crate::id::FileId;
use serde::{Deserialize, Serialize};

/// One slide in a presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Slide {
    /// Slide heading
    pub title: String,
    /// Markdown body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Embedded document (question or dashboard), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<FileId>,
}

/// Content payload of a presentation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PresentationContent {
    /// Ordered slides
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Deck theme name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}
