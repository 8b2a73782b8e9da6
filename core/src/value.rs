//! Coerced parameter values.
//!
//! [`coerce`] turns a raw command-line string into a [`Value`] according to
//! a [`ParameterKind`]. Switches are not coerced from text: their value is
//! produced directly by the binder when a switch token is seen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ParameterKind, SchemaError};

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Switch(bool),
    Strings(Vec<String>),
    /// A single enum member, with its declared spelling.
    Enum { member: String, value: i64 },
    /// A flags combination: the members that were selected and their OR.
    Flags { members: Vec<String>, bits: i64 },
}

impl Value {
    /// Short label of the value's shape, for mismatch messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Switch(_) => "switch",
            Self::Strings(_) => "string-array",
            Self::Enum { .. } => "enum",
            Self::Flags { .. } => "flags",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_switch(&self) -> Option<bool> {
        match self {
            Self::Switch(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Strings(values) => Some(values),
            _ => None,
        }
    }

    /// Underlying integer of an enum member or flags combination.
    pub fn as_bits(&self) -> Option<i64> {
        match self {
            Self::Enum { value, .. } => Some(*value),
            Self::Flags { bits, .. } => Some(*bits),
            _ => None,
        }
    }

    /// Declared name of a plain enum member.
    pub fn as_member(&self) -> Option<&str> {
        match self {
            Self::Enum { member, .. } => Some(member),
            _ => None,
        }
    }
}

/// Why a raw string could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("not a 32-bit base-10 integer: {0}")]
    NotAnInteger(String),
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("multiple values given for a single-valued enum: {0}")]
    MultipleValues(String),
    #[error("a switch does not take a value")]
    SwitchValue,
}

/// Coerces `raw` into a value of the given kind.
///
/// # Examples
///
/// ```
/// use command_binder_core::{ParameterKind, Value, coerce};
///
/// assert_eq!(coerce(&ParameterKind::Int, "3").unwrap(), Value::Int(3));
/// assert_eq!(
///     coerce(&ParameterKind::StringArray, ",first,,second,").unwrap(),
///     Value::Strings(vec!["first".into(), "second".into()]),
/// );
///
/// let flags = ParameterKind::flags([("Windows", 1), ("Unix", 2), ("Linux", 4)]);
/// assert_eq!(coerce(&flags, "windows,linux").unwrap().as_bits(), Some(5));
/// ```
pub fn coerce(kind: &ParameterKind, raw: &str) -> Result<Value, CoerceError> {
    match kind {
        ParameterKind::String => Ok(Value::String(raw.to_string())),
        // Int parameters are 32-bit; the wider storage leaves room for enum values.
        ParameterKind::Int => raw
            .parse::<i32>()
            .map(|i| Value::Int(i64::from(i)))
            .map_err(|_| CoerceError::NotAnInteger(raw.to_string())),
        ParameterKind::Switch => Err(CoerceError::SwitchValue),
        ParameterKind::StringArray => Ok(Value::Strings(split_list(raw))),
        ParameterKind::Enum { members } => {
            if raw.contains(',') {
                return Err(CoerceError::MultipleValues(raw.to_string()));
            }
            let member = members
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(raw))
                .ok_or_else(|| CoerceError::UnknownMember(raw.to_string()))?;
            Ok(Value::Enum {
                member: member.name.clone(),
                value: member.value,
            })
        }
        ParameterKind::Flags { members } => {
            let mut selected = Vec::new();
            let mut bits = 0;
            for segment in raw.split(',') {
                let member = members
                    .iter()
                    .find(|m| m.name.eq_ignore_ascii_case(segment))
                    .ok_or_else(|| CoerceError::UnknownMember(segment.to_string()))?;
                bits |= member.value;
                selected.push(member.name.clone());
            }
            Ok(Value::Flags {
                members: selected,
                bits,
            })
        }
    }
}

/// Splits a comma-separated list, dropping blank segments.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|segment| !segment.trim().is_empty())
        .map(String::from)
        .collect()
}

fn mismatch(expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::ValueMismatch {
        expected,
        found: value.label(),
    }
}

impl TryFrom<Value> for String {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            Value::Enum { member, .. } => Ok(member),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| mismatch("int", &value))
    }
}

impl TryFrom<Value> for i32 {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let wide = i64::try_from(value)?;
        i32::try_from(wide).map_err(|_| SchemaError::ValueMismatch {
            expected: "int",
            found: "out-of-range int",
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_switch().ok_or_else(|| mismatch("switch", &value))
    }
}

impl TryFrom<Value> for Vec<String> {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Strings(values) => Ok(values),
            Value::Flags { members, .. } => Ok(members),
            other => Err(mismatch("string-array", &other)),
        }
    }
}
