//! Report content: an agent-executed narrative document

use serde::{Deserialize, Serialize};

/// When a report or alert executes automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Cron expression evaluated by the backend
    pub cron: String,
    /// IANA timezone; `None` = workspace timezone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Content payload of a report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportContent {
    /// Report body (markdown with embedded question references)
    pub body: String,
    /// Automatic execution schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Delivery recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serde_minimal() {
        let content = ReportContent {
            body: "## Summary".to_string(),
            ..ReportContent::default()
        };
        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(json, r###"{"body":"## Summary"}"###);
    }

    #[test]
    fn schedule_roundtrip() {
        let schedule = Schedule {
            cron: "0 9 * * 1".to_string(),
            timezone: Some("Europe/Berlin".to_string()),
        };
        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, back);
    }
}
