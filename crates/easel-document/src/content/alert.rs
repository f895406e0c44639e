//! Alert content: a condition checked against a question's result
//!
//! The condition is summarised for views by [`Condition::summary`], e.g.
//! `{count, all, >, 10}` renders as `"row count > 10"`.

use crate::content::report::Schedule;
use crate::error::DocumentError;
use crate::id::FileId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Aggregate applied to the question result before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionFunction {
    Count,
    Min,
    Max,
    Sum,
    Average,
}

impl ConditionFunction {
    /// Word used in summaries
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Average => "average",
        }
    }
}

/// Which part of the result the aggregate ranges over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionSelector {
    /// Every row
    All,
    /// Any row
    Any,
    /// A named column
    #[serde(untagged)]
    Column(String),
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "<")]
    Below,
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl Display for ConditionOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Above => ">",
            Self::Below => "<",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Equal => "=",
            Self::NotEqual => "!=",
        };
        f.write_str(symbol)
    }
}

/// The alert condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Aggregate function
    pub function: ConditionFunction,
    /// Result selector
    pub selector: ConditionSelector,
    /// Comparison operator
    pub operator: ConditionOperator,
    /// Comparison threshold
    pub threshold: f64,
}

impl Condition {
    /// Human-readable summary, e.g. `"row count > 10"`
    #[must_use]
    pub fn summary(&self) -> String {
        let subject = match (&self.function, &self.selector) {
            (ConditionFunction::Count, ConditionSelector::All | ConditionSelector::Any) => {
                "row count".to_string()
            }
            (function, ConditionSelector::Column(column)) => {
                format!("{} of {column}", function.as_str())
            }
            (function, _) => format!("{} value", function.as_str()),
        };
        format!(
            "{subject} {} {}",
            self.operator,
            format_threshold(self.threshold)
        )
    }

    /// Typed validation before merge or save
    ///
    /// # Errors
    /// Returns a validation error for non-finite thresholds or an empty
    /// column selector
    pub fn validate(&self) -> Result<(), DocumentError> {
        if !self.threshold.is_finite() {
            return Err(DocumentError::validation("threshold must be finite"));
        }
        if let ConditionSelector::Column(column) = &self.selector {
            if column.trim().is_empty() {
                return Err(DocumentError::validation("column selector must be named"));
            }
        }
        Ok(())
    }
}

/// Content payload of an alert document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertContent {
    /// The question whose result is checked
    pub question_id: FileId,
    /// Trigger condition
    pub condition: Condition,
    /// Automatic check schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

// Integral thresholds print without a trailing ".0".
fn format_threshold(threshold: f64) -> String {
    if threshold.fract() == 0.0 && threshold.abs() < 1e15 {
        format!("{}", threshold as i64)
    } else {
        format!("{threshold}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(
        function: ConditionFunction,
        selector: ConditionSelector,
        operator: ConditionOperator,
        threshold: f64,
    ) -> Condition {
        Condition {
            function,
            selector,
            operator,
            threshold,
        }
    }

    #[test]
    fn summary_row_count() {
        let c = condition(
            ConditionFunction::Count,
            ConditionSelector::All,
            ConditionOperator::Above,
            10.0,
        );
        assert_eq!(c.summary(), "row count > 10");
    }

    #[test]
    fn summary_column_aggregate() {
        let c = condition(
            ConditionFunction::Min,
            ConditionSelector::Column("revenue".to_string()),
            ConditionOperator::Below,
            0.5,
        );
        assert_eq!(c.summary(), "min of revenue < 0.5");
    }

    #[test]
    fn summary_value_aggregate() {
        let c = condition(
            ConditionFunction::Sum,
            ConditionSelector::Any,
            ConditionOperator::AtLeast,
            100.0,
        );
        assert_eq!(c.summary(), "sum value >= 100");
    }

    #[test]
    fn selector_serde_plain_strings() {
        assert_eq!(
            serde_json::to_string(&ConditionSelector::All).unwrap(),
            "\"all\""
        );
        let column: ConditionSelector = serde_json::from_str("\"revenue\"").unwrap();
        assert_eq!(column, ConditionSelector::Column("revenue".to_string()));
    }

    #[test]
    fn operator_serde_symbols() {
        assert_eq!(
            serde_json::to_string(&ConditionOperator::Above).unwrap(),
            "\">\""
        );
        let parsed: ConditionOperator = serde_json::from_str("\"!=\"").unwrap();
        assert_eq!(parsed, ConditionOperator::NotEqual);
    }

    #[test]
    fn condition_wire_shape() {
        let json = r#"{"function":"count","selector":"all","operator":">","threshold":10}"#;
        let c: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(c.summary(), "row count > 10");
    }

    #[test]
    fn validate_rejects_non_finite_threshold() {
        let c = condition(
            ConditionFunction::Count,
            ConditionSelector::All,
            ConditionOperator::Above,
            f64::NAN,
        );
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_unnamed_column() {
        let c = condition(
            ConditionFunction::Min,
            ConditionSelector::Column("  ".to_string()),
            ConditionOperator::Below,
            0.0,
        );
        assert!(c.validate().is_err());
    }
}
