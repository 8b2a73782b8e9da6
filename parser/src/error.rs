//! Parse error taxonomy.
//!
//! [`ParseError`] describes bad user input and is an expected outcome of
//! parsing. Schema mistakes are reported separately as
//! [`SchemaError`](command_binder_core::SchemaError); [`Error`] unites both
//! for callers that want a single `?`-able type.

use command_binder_core::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// A command word matches no declared command.
    InvalidCommand,
    /// No command was given and the context has no default command.
    NoCommand,
    /// A mandatory parameter was not supplied.
    MissingParameter,
    /// A named token matches no parameter, or has the wrong shape for it.
    InvalidParameter,
    /// An option is not followed by a value.
    MissingValue,
    /// A value cannot be coerced to the parameter's kind.
    InvalidValue,
    /// Bare words appear where positional parameters are not accepted.
    InvalidPositionalParameters,
    /// A value violates a parameter constraint.
    Constraint,
    /// General invalid input.
    Invalid,
}

/// A structured parse error: what went wrong, on which token or parameter,
/// and a human-readable message.
///
/// # Examples
///
/// ```
/// use command_binder::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::MissingValue, "-my");
/// assert_eq!(err.to_string(), "Missing value: -my");
/// assert_eq!(err.subject, "-my");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Offending token text or parameter name.
    pub subject: String,
    pub message: String,
}

impl ParseError {
    /// Creates an error with the default message for `kind`.
    pub fn new(kind: ParseErrorKind, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        let message = default_message(kind, &subject);
        Self {
            kind,
            subject,
            message,
        }
    }

    /// Creates an error with an explicit message.
    pub fn with_message(
        kind: ParseErrorKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

fn default_message(kind: ParseErrorKind, subject: &str) -> String {
    match kind {
        ParseErrorKind::InvalidCommand => format!("Invalid command: {subject}"),
        ParseErrorKind::NoCommand => "No command has been specified".to_string(),
        ParseErrorKind::MissingParameter => format!("Missing parameter: {subject}"),
        ParseErrorKind::InvalidParameter => format!("Invalid parameter: {subject}"),
        ParseErrorKind::MissingValue => format!("Missing value: {subject}"),
        ParseErrorKind::InvalidValue => format!("Invalid value: {subject}"),
        ParseErrorKind::InvalidPositionalParameters => {
            "Positional parameters should come at the end".to_string()
        }
        ParseErrorKind::Constraint => format!("Constraint error: {subject}"),
        ParseErrorKind::Invalid => "Invalid arguments".to_string(),
    }
}

/// Either a schema error or a parse error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
