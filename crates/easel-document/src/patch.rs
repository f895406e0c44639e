//! Typed partial updates
//!
//! A [`DocumentPatch`] is a tagged union of per-kind patch structs, the
//! change-buffer currency of the whole system. Patches merge shallowly:
//! last write wins per field, and nested objects are replaced whole, never
//! deep-merged. Every patch is validated before it enters a buffer.
//!
//! Field conventions:
//! - `Option<T>` for required content fields (set or leave alone)
//! - [`Patch<T>`] for nullable content fields (leave alone, clear, or set)

use crate::content::{
    Condition, ConnectionDriver, DashboardAsset, DocumentContent, GridLayout, Schedule, Slide,
    Visualization,
};
use crate::error::DocumentError;
use crate::id::FileId;
use crate::kind::DocumentKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A three-state update for a nullable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the field untouched
    Keep,
    /// Reset the field to `None`
    Clear,
    /// Replace the field with a value
    Set(T),
}

// Manual impl: `Keep` needs no `T: Default` bound.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    /// True if the field is untouched
    #[inline]
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Apply onto an optional slot
    pub fn apply_to(&self, slot: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value.clone()),
        }
    }

    /// Value reference, if set
    #[inline]
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

// On the wire a `Patch` field is absent (Keep), null (Clear), or a value
// (Set), the shape JavaScript clients already send.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Keep | Self::Clear => serializer.serialize_none(),
            Self::Set(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// Partial update to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub connection: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub visualization: Patch<Visualization>,
}

impl QuestionPatch {
    fn is_empty(&self) -> bool {
        self.query.is_none() && self.connection.is_keep() && self.visualization.is_keep()
    }

    fn validate(&self) -> Result<(), DocumentError> {
        match &self.query {
            Some(query) if query.trim().is_empty() => {
                Err(DocumentError::validation("query must not be empty"))
            }
            _ => Ok(()),
        }
    }

    fn apply(&self, content: &mut crate::content::QuestionContent) {
        if let Some(query) = &self.query {
            content.query.clone_from(query);
        }
        self.connection.apply_to(&mut content.connection);
        self.visualization.apply_to(&mut content.visualization);
    }

    fn merge(&mut self, later: Self) {
        if later.query.is_some() {
            self.query = later.query;
        }
        if !later.connection.is_keep() {
            self.connection = later.connection;
        }
        if !later.visualization.is_keep() {
            self.visualization = later.visualization;
        }
    }
}

/// Partial update to a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<DashboardAsset>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub layout: Patch<GridLayout>,
}

impl DashboardPatch {
    fn is_empty(&self) -> bool {
        self.assets.is_none() && self.layout.is_keep()
    }

    fn validate(&self) -> Result<(), DocumentError> {
        match self.layout.as_set() {
            Some(layout) => layout.validate(),
            None => Ok(()),
        }
    }

    fn apply(&self, content: &mut crate::content::DashboardContent) {
        if let Some(assets) = &self.assets {
            content.assets.clone_from(assets);
        }
        self.layout.apply_to(&mut content.layout);
    }

    fn merge(&mut self, later: Self) {
        if later.assets.is_some() {
            self.assets = later.assets;
        }
        if !later.layout.is_keep() {
            self.layout = later.layout;
        }
    }
}

/// Partial update to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub schedule: Patch<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
}

impl ReportPatch {
    fn is_empty(&self) -> bool {
        self.body.is_none() && self.schedule.is_keep() && self.recipients.is_none()
    }

    fn validate(&self) -> Result<(), DocumentError> {
        validate_schedule(&self.schedule)
    }

    fn apply(&self, content: &mut crate::content::ReportContent) {
        if let Some(body) = &self.body {
            content.body.clone_from(body);
        }
        self.schedule.apply_to(&mut content.schedule);
        if let Some(recipients) = &self.recipients {
            content.recipients.clone_from(recipients);
        }
    }

    fn merge(&mut self, later: Self) {
        if later.body.is_some() {
            self.body = later.body;
        }
        if !later.schedule.is_keep() {
            self.schedule = later.schedule;
        }
        if later.recipients.is_some() {
            self.recipients = later.recipients;
        }
    }
}

/// Partial update to an alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AlertPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub schedule: Patch<Schedule>,
}

impl AlertPatch {
    fn is_empty(&self) -> bool {
        self.question_id.is_none() && self.condition.is_none() && self.schedule.is_keep()
    }

    fn validate(&self) -> Result<(), DocumentError> {
        if let Some(condition) = &self.condition {
            condition.validate()?;
        }
        validate_schedule(&self.schedule)
    }

    fn apply(&self, content: &mut crate::content::AlertContent) {
        if let Some(question_id) = self.question_id {
            content.question_id = question_id;
        }
        if let Some(condition) = &self.condition {
            content.condition.clone_from(condition);
        }
        self.schedule.apply_to(&mut content.schedule);
    }

    fn merge(&mut self, later: Self) {
        if later.question_id.is_some() {
            self.question_id = later.question_id;
        }
        if later.condition.is_some() {
            self.condition = later.condition;
        }
        if !later.schedule.is_keep() {
            self.schedule = later.schedule;
        }
    }
}

/// Partial update to a presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PresentationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Slide>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub theme: Patch<String>,
}

impl PresentationPatch {
    fn is_empty(&self) -> bool {
        self.slides.is_none() && self.theme.is_keep()
    }

    fn apply(&self, content: &mut crate::content::PresentationContent) {
        if let Some(slides) = &self.slides {
            content.slides.clone_from(slides);
        }
        self.theme.apply_to(&mut content.theme);
    }

    fn merge(&mut self, later: Self) {
        if later.slides.is_some() {
            self.slides = later.slides;
        }
        if !later.theme.is_keep() {
            self.theme = later.theme;
        }
    }
}

/// Partial update to a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConnectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<ConnectionDriver>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub host: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub port: Patch<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub username: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, String>>,
}

impl ConnectionPatch {
    fn is_empty(&self) -> bool {
        self.driver.is_none()
            && self.host.is_keep()
            && self.port.is_keep()
            && self.database.is_none()
            && self.username.is_keep()
            && self.options.is_none()
    }

    fn validate(&self) -> Result<(), DocumentError> {
        if let Some(database) = &self.database {
            if database.trim().is_empty() {
                return Err(DocumentError::validation("database must not be empty"));
            }
        }
        if self.port.as_set() == Some(&0) {
            return Err(DocumentError::validation("port must be non-zero"));
        }
        Ok(())
    }

    fn apply(&self, content: &mut crate::content::ConnectionContent) {
        if let Some(driver) = self.driver {
            content.driver = driver;
        }
        self.host.apply_to(&mut content.host);
        self.port.apply_to(&mut content.port);
        if let Some(database) = &self.database {
            content.database.clone_from(database);
        }
        self.username.apply_to(&mut content.username);
        if let Some(options) = &self.options {
            content.options.clone_from(options);
        }
    }

    fn merge(&mut self, later: Self) {
        if later.driver.is_some() {
            self.driver = later.driver;
        }
        if !later.host.is_keep() {
            self.host = later.host;
        }
        if !later.port.is_keep() {
            self.port = later.port;
        }
        if later.database.is_some() {
            self.database = later.database;
        }
        if !later.username.is_keep() {
            self.username = later.username;
        }
        if later.options.is_some() {
            self.options = later.options;
        }
    }
}

/// A typed partial update to one document
///
/// Run logs and conversations have no patch variant: runs are immutable
/// once written and conversation logs are appended by the backend only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentPatch {
    Question(QuestionPatch),
    Dashboard(DashboardPatch),
    Report(ReportPatch),
    Alert(AlertPatch),
    Presentation(PresentationPatch),
    Connection(ConnectionPatch),
}

impl DocumentPatch {
    /// The document kind this patch applies to
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
        }
    }

    /// True if no field is set; an empty buffer is never dirty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Question(p) => p.is_empty(),
            Self::Dashboard(p) => p.is_empty(),
            Self::Report(p) => p.is_empty(),
            Self::Alert(p) => p.is_empty(),
            Self::Presentation(p) => p.is_empty(),
            Self::Connection(p) => p.is_empty(),
        }
    }

    /// Typed validation, performed before the patch enters a buffer
    ///
    /// # Errors
    /// Returns the first field validation failure
    pub fn validate(&self) -> Result<(), DocumentError> {
        match self {
            Self::Question(p) => p.validate(),
            Self::Dashboard(p) => p.validate(),
            Self::Report(p) => p.validate(),
            Self::Alert(p) => p.validate(),
            Self::Presentation(_) => Ok(()),
            Self::Connection(p) => p.validate(),
        }
    }

    /// Apply onto a content payload, shallow and last-write-wins
    ///
    /// # Errors
    /// Returns [`DocumentError::KindMismatch`] if the patch targets a
    /// different kind than the content
    pub fn apply_to(&self, content: &mut DocumentContent) -> Result<(), DocumentError> {
        match (self, content) {
            (Self::Question(p), DocumentContent::Question(c)) => p.apply(c),
            (Self::Dashboard(p), DocumentContent::Dashboard(c)) => p.apply(c),
            (Self::Report(p), DocumentContent::Report(c)) => p.apply(c),
            (Self::Alert(p), DocumentContent::Alert(c)) => p.apply(c),
            (Self::Presentation(p), DocumentContent::Presentation(c)) => p.apply(c),
            (Self::Connection(p), DocumentContent::Connection(c)) => p.apply(c),
            (patch, content) => {
                return Err(DocumentError::KindMismatch {
                    expected: content.kind(),
                    actual: patch.kind(),
                })
            }
        }
        Ok(())
    }

    /// Fold a later patch into this one (buffer accumulation)
    ///
    /// # Errors
    /// Returns [`DocumentError::KindMismatch`] if the kinds differ
    pub fn merge(&mut self, later: DocumentPatch) -> Result<(), DocumentError> {
        match (self, later) {
            (Self::Question(p), Self::Question(l)) => p.merge(l),
            (Self::Dashboard(p), Self::Dashboard(l)) => p.merge(l),
            (Self::Report(p), Self::Report(l)) => p.merge(l),
            (Self::Alert(p), Self::Alert(l)) => p.merge(l),
            (Self::Presentation(p), Self::Presentation(l)) => p.merge(l),
            (Self::Connection(p), Self::Connection(l)) => p.merge(l),
            (earlier, later) => {
                return Err(DocumentError::KindMismatch {
                    expected: earlier.kind(),
                    actual: later.kind(),
                })
            }
        }
        Ok(())
    }
}

fn validate_schedule(schedule: &Patch<Schedule>) -> Result<(), DocumentError> {
    match schedule.as_set() {
        Some(schedule) if schedule.cron.trim().is_empty() => {
            Err(DocumentError::validation("schedule cron must not be empty"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::QuestionContent;
    use pretty_assertions::assert_eq;

    fn query_patch(query: &str) -> DocumentPatch {
        DocumentPatch::Question(QuestionPatch {
            query: Some(query.to_string()),
            ..QuestionPatch::default()
        })
    }

    #[test]
    fn empty_patch_is_empty() {
        let patch = DocumentPatch::Question(QuestionPatch::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn apply_replaces_only_set_fields() {
        let mut content = DocumentContent::Question(QuestionContent {
            query: "SELECT 1".to_string(),
            connection: Some("warehouse".to_string()),
            visualization: None,
        });
        query_patch("SELECT 2").apply_to(&mut content).unwrap();

        let DocumentContent::Question(question) = content else {
            panic!("kind changed");
        };
        assert_eq!(question.query, "SELECT 2");
        assert_eq!(question.connection.as_deref(), Some("warehouse"));
    }

    #[test]
    fn clear_resets_nullable_field() {
        let mut content = DocumentContent::Question(QuestionContent {
            query: "SELECT 1".to_string(),
            connection: Some("warehouse".to_string()),
            visualization: None,
        });
        let patch = DocumentPatch::Question(QuestionPatch {
            connection: Patch::Clear,
            ..QuestionPatch::default()
        });
        patch.apply_to(&mut content).unwrap();

        let DocumentContent::Question(question) = content else {
            panic!("kind changed");
        };
        assert_eq!(question.connection, None);
        assert_eq!(question.query, "SELECT 1");
    }

    #[test]
    fn merge_last_write_wins_per_field() {
        let mut buffer = query_patch("SELECT a");
        buffer.merge(query_patch("SELECT b")).unwrap();

        let DocumentPatch::Question(question) = &buffer else {
            panic!("kind changed");
        };
        assert_eq!(question.query.as_deref(), Some("SELECT b"));
    }

    #[test]
    fn merge_keeps_disjoint_fields() {
        let mut buffer = query_patch("SELECT a");
        buffer
            .merge(DocumentPatch::Question(QuestionPatch {
                connection: Patch::Set("warehouse".to_string()),
                ..QuestionPatch::default()
            }))
            .unwrap();

        let DocumentPatch::Question(question) = &buffer else {
            panic!("kind changed");
        };
        assert_eq!(question.query.as_deref(), Some("SELECT a"));
        assert_eq!(question.connection.as_set().map(String::as_str), Some("warehouse"));
    }

    #[test]
    fn merge_rejects_kind_mismatch() {
        let mut buffer = query_patch("SELECT 1");
        let result = buffer.merge(DocumentPatch::Dashboard(DashboardPatch::default()));
        assert!(matches!(result, Err(DocumentError::KindMismatch { .. })));
    }

    #[test]
    fn apply_rejects_kind_mismatch() {
        let mut content = DocumentContent::Question(QuestionContent::default());
        let patch = DocumentPatch::Dashboard(DashboardPatch::default());
        assert!(matches!(
            patch.apply_to(&mut content),
            Err(DocumentError::KindMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_query() {
        assert!(query_patch("   ").validate().is_err());
        assert!(query_patch("SELECT 1").validate().is_ok());
    }

    #[test]
    fn patch_serde_absent_null_value() {
        let patch: QuestionPatch =
            serde_json::from_str(r#"{"query":"SELECT 1","connection":null}"#).unwrap();
        assert_eq!(patch.query.as_deref(), Some("SELECT 1"));
        assert_eq!(patch.connection, Patch::Clear);
        assert!(patch.visualization.is_keep());
    }

    #[test]
    fn patch_serde_skips_keep_fields() {
        let patch = DocumentPatch::Question(QuestionPatch {
            query: Some("SELECT 1".to_string()),
            ..QuestionPatch::default()
        });
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"kind":"question","query":"SELECT 1"}"#);
    }
}
