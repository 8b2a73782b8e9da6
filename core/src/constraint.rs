//! Post-coercion constraints on parameter values.

use serde::{Deserialize, Serialize};

use crate::{ParameterKind, Value};

/// Validation rule applied to a coerced value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ConstraintRule {
    /// Integer in `min..max` (or `min..=max` when `max_inclusive`).
    Range {
        min: i64,
        max: i64,
        #[serde(default)]
        max_inclusive: bool,
    },
    /// Character count of a string, or element count of a string array.
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Non-blank string, or non-empty string array.
    NotEmpty,
}

/// A rule plus the message reported when it fails.
///
/// The message is a template: `{name}` is replaced with the parameter's
/// primary name.
///
/// # Examples
///
/// ```
/// use command_binder_core::{Constraint, Value};
///
/// let range = Constraint::range(3, 100);
/// assert!(range.check(&Value::Int(3)));
/// assert!(!range.check(&Value::Int(100)));
/// assert!(Constraint::range(3, 100).max_inclusive().check(&Value::Int(100)));
///
/// assert_eq!(range.message_for("some"), "Not in correct range: some");
/// let custom = Constraint::not_empty().with_message("{name} must not be blank");
/// assert_eq!(custom.message_for("title"), "title must not be blank");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(flatten)]
    pub rule: ConstraintRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Constraint {
    pub fn new(rule: ConstraintRule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    /// Integer range with an exclusive upper bound.
    pub fn range(min: i64, max: i64) -> Self {
        Self::new(ConstraintRule::Range {
            min,
            max,
            max_inclusive: false,
        })
    }

    /// Makes a range constraint's upper bound inclusive. No-op for other
    /// rules.
    pub fn max_inclusive(mut self) -> Self {
        if let ConstraintRule::Range { max_inclusive, .. } = &mut self.rule {
            *max_inclusive = true;
        }
        self
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::new(ConstraintRule::Length { min, max })
    }

    pub fn not_empty() -> Self {
        Self::new(ConstraintRule::NotEmpty)
    }

    /// Overrides the failure message template.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Whether this constraint can be evaluated against values of `kind`.
    pub fn applies_to(&self, kind: &ParameterKind) -> bool {
        match self.rule {
            ConstraintRule::Range { .. } => matches!(kind, ParameterKind::Int),
            ConstraintRule::Length { .. } | ConstraintRule::NotEmpty => {
                matches!(kind, ParameterKind::String | ParameterKind::StringArray)
            }
        }
    }

    /// Evaluates the constraint. Values of a shape the rule does not know
    /// about are rejected.
    pub fn check(&self, value: &Value) -> bool {
        match (&self.rule, value) {
            (
                ConstraintRule::Range {
                    min,
                    max,
                    max_inclusive,
                },
                Value::Int(v),
            ) => {
                if v < min {
                    return false;
                }
                if *max_inclusive { v <= max } else { v < max }
            }
            (ConstraintRule::Length { min, max }, Value::String(s)) => {
                within(s.chars().count(), *min, *max)
            }
            (ConstraintRule::Length { min, max }, Value::Strings(values)) => {
                within(values.len(), *min, *max)
            }
            (ConstraintRule::NotEmpty, Value::String(s)) => !s.trim().is_empty(),
            (ConstraintRule::NotEmpty, Value::Strings(values)) => !values.is_empty(),
            _ => false,
        }
    }

    /// Renders the failure message for the parameter named `name`.
    pub fn message_for(&self, name: &str) -> String {
        match &self.message {
            Some(template) => template.replace("{name}", name),
            None => match self.rule {
                ConstraintRule::Range { .. } => format!("Not in correct range: {name}"),
                ConstraintRule::Length { .. } => format!("Invalid length: {name}"),
                ConstraintRule::NotEmpty => format!("Cannot be empty: {name}"),
            },
        }
    }
}

fn within(count: usize, min: Option<usize>, max: Option<usize>) -> bool {
    min.is_none_or(|m| count >= m) && max.is_none_or(|m| count <= m)
}
