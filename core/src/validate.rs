//! Context schema validation.
//!
//! Validates the structural invariants of a [`ContextSchema`] before any
//! argument is parsed: well-formed names, unique siblings, a usable default
//! command, coercible defaults that satisfy their own constraints, and so on.
//! Every problem found here is a mistake by the CLI author, never by the user
//! typing arguments, so these errors are kept separate from parse errors.
//!
//! # Examples
//!
//! ```
//! use command_binder_core::*;
//!
//! let context = ContextSchema::new()
//!     .with_default_command(CommandSchema::default().with_parameter(ParameterSchema::string("my")));
//! assert!(validate_context(&context).is_empty());
//!
//! // Invalid: whitespace in a parameter name
//! let bad = ContextSchema::new()
//!     .with_default_command(CommandSchema::default().with_parameter(ParameterSchema::string("my not")));
//! assert_eq!(
//!     validate_context(&bad),
//!     vec![SchemaError::InvalidParameterName("my not".to_string())],
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandSchema, ContextSchema, ParameterKind, ParameterSchema, Prefixes, coerce};

/// Maximum nesting depth of commands below the context.
pub const MAX_COMMAND_DEPTH: usize = 32;

const FORBIDDEN_NAME_CHARS: &[char] = &[' ', '\t', '\r', '\n', '\\', '/'];

/// Schema (configuration) errors.
///
/// These indicate an invalid declaration and are raised before, or
/// independently of, user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The context declares neither a default command nor included commands.
    #[error("the context must declare a default command, included commands, or both")]
    EmptyContext,
    /// The default command is also listed among the included commands.
    #[error("the default command should not be included as a command: {0}")]
    DefaultCommandIncluded(String),
    /// The default command declares nested commands, which are unreachable.
    #[error("the default command cannot declare nested commands: {0}")]
    DefaultCommandHasCommands(String),
    /// A command name is empty or contains forbidden characters.
    #[error("the command's name contains invalid characters: {0:?}")]
    InvalidCommandName(String),
    /// Two sibling commands share a name.
    #[error("duplicate command in scope: {0}")]
    DuplicateCommand(String),
    /// A parameter declares no names.
    #[error("parameter without names in command: {0}")]
    MissingParameterName(String),
    /// A parameter name is empty or contains forbidden characters.
    #[error("the parameter's names contain invalid characters: {0:?}")]
    InvalidParameterName(String),
    /// Two parameters of one command share a name.
    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),
    /// Two parameters of one command share a position.
    #[error("duplicate parameter position {position} in command: {command}")]
    DuplicatePosition { command: String, position: u32 },
    /// A switch was given a position; switches cannot be bound from bare words.
    #[error("switch parameter cannot be positional: {0}")]
    PositionalSwitch(String),
    /// An enum or flags parameter declares no members.
    #[error("enum parameter declares no members: {0}")]
    EmptyEnum(String),
    /// A constraint cannot be evaluated against the parameter's kind.
    #[error("constraint cannot apply to {kind} parameter: {parameter}")]
    ConstraintNotApplicable {
        parameter: String,
        kind: &'static str,
    },
    /// A mandatory parameter also declares a default, which would never apply.
    #[error("mandatory parameter declares a default value: {0}")]
    MandatoryWithDefault(String),
    /// A default value cannot be coerced to the parameter's kind.
    #[error("a default value could not be bound for {parameter}: {reason}")]
    InvalidDefault { parameter: String, reason: String },
    /// A default value violates one of the parameter's own constraints.
    #[error("default value of {parameter} violates its constraint: {message}")]
    DefaultViolatesConstraint { parameter: String, message: String },
    /// Option and switch prefixes are empty or identical.
    #[error("invalid token prefixes: option {option:?}, switch {switch:?}")]
    InvalidPrefixes { option: String, switch: String },
    /// A command includes itself, directly or transitively.
    #[error("command cycle detected at path: {0}")]
    CommandCycle(String),
    /// The command tree is nested deeper than [`MAX_COMMAND_DEPTH`].
    #[error("commands nested deeper than {MAX_COMMAND_DEPTH} levels at: {0}")]
    TooDeep(String),
    /// A typed command was asked to store a value of the wrong shape.
    #[error("expected a {expected} value, found {found}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A typed command does not know a declared parameter.
    #[error("command does not accept parameter: {0}")]
    UnknownParameter(String),
}

/// Validates a full context schema.
///
/// Returns every problem found; an empty vector means the schema is usable.
pub fn validate_context(context: &ContextSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    validate_prefixes(&context.options.prefixes, &mut errors);

    if context.default_command.is_none() && context.commands.is_empty() {
        errors.push(SchemaError::EmptyContext);
        return errors;
    }

    if let Some(default) = &context.default_command {
        if !default.name.is_empty() {
            if !is_valid_name(&default.name) {
                errors.push(SchemaError::InvalidCommandName(default.name.clone()));
            }
            if context
                .commands
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&default.name))
            {
                errors.push(SchemaError::DefaultCommandIncluded(default.name.clone()));
            }
        }
        validate_parameters(default, &mut errors);
        // Resolution only walks the included commands.
        if let Some(nested) = default.commands.first() {
            errors.push(SchemaError::DefaultCommandHasCommands(nested.name.clone()));
        }
    }

    let mut path = Vec::new();
    validate_commands(&context.commands, &mut path, &mut errors);

    errors
}

/// Validates a single command subtree.
pub fn validate_command(command: &CommandSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    if !is_valid_name(&command.name) {
        errors.push(SchemaError::InvalidCommandName(command.name.clone()));
    }
    validate_parameters(command, &mut errors);
    let mut path = vec![command.name.clone()];
    validate_commands(&command.commands, &mut path, &mut errors);
    errors
}

/// Whether `name` is usable as a command or parameter name.
///
/// Names must be non-empty, contain no whitespace, `/` or `\`, and must not
/// start or end with `-` (which would collide with the token prefixes).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(FORBIDDEN_NAME_CHARS)
        && !name.starts_with('-')
        && !name.ends_with('-')
}

fn display_name(command: &CommandSchema) -> &str {
    if command.name.is_empty() {
        "<default>"
    } else {
        &command.name
    }
}

fn validate_prefixes(prefixes: &Prefixes, errors: &mut Vec<SchemaError>) {
    if prefixes.option.is_empty()
        || prefixes.switch.is_empty()
        || prefixes.option == prefixes.switch
    {
        errors.push(SchemaError::InvalidPrefixes {
            option: prefixes.option.clone(),
            switch: prefixes.switch.clone(),
        });
    }
}

fn validate_commands(
    commands: &[CommandSchema],
    path: &mut Vec<String>,
    errors: &mut Vec<SchemaError>,
) {
    if path.len() > MAX_COMMAND_DEPTH {
        errors.push(SchemaError::TooDeep(path.join(" ")));
        return;
    }

    let mut seen: HashSet<String> = HashSet::new();
    for command in commands {
        if !is_valid_name(&command.name) {
            errors.push(SchemaError::InvalidCommandName(command.name.clone()));
            continue;
        }
        if !seen.insert(command.name.to_ascii_lowercase()) {
            let full = path
                .iter()
                .cloned()
                .chain(std::iter::once(command.name.clone()))
                .collect::<Vec<_>>()
                .join(" ");
            errors.push(SchemaError::DuplicateCommand(full));
            continue;
        }

        validate_parameters(command, errors);

        path.push(command.name.clone());
        validate_commands(&command.commands, path, errors);
        path.pop();
    }
}

fn validate_parameters(command: &CommandSchema, errors: &mut Vec<SchemaError>) {
    let mut names: HashSet<&str> = HashSet::new();
    let mut positions: HashSet<u32> = HashSet::new();

    for parameter in &command.parameters {
        if parameter.names.is_empty() {
            errors.push(SchemaError::MissingParameterName(
                display_name(command).to_string(),
            ));
            continue;
        }
        for name in &parameter.names {
            if !is_valid_name(name) {
                errors.push(SchemaError::InvalidParameterName(name.clone()));
            } else if !names.insert(name) {
                errors.push(SchemaError::DuplicateParameter(name.clone()));
            }
        }

        if let Some(position) = parameter.position {
            if matches!(parameter.kind, ParameterKind::Switch) {
                errors.push(SchemaError::PositionalSwitch(
                    parameter.primary_name().to_string(),
                ));
            } else if !positions.insert(position) {
                errors.push(SchemaError::DuplicatePosition {
                    command: display_name(command).to_string(),
                    position,
                });
            }
        }

        validate_parameter_kind(parameter, errors);
        validate_default(parameter, errors);
    }
}

fn validate_parameter_kind(parameter: &ParameterSchema, errors: &mut Vec<SchemaError>) {
    let name = parameter.primary_name();

    if matches!(
        parameter.kind,
        ParameterKind::Enum { .. } | ParameterKind::Flags { .. }
    ) && parameter.kind.members().is_empty()
    {
        errors.push(SchemaError::EmptyEnum(name.to_string()));
    }

    for constraint in &parameter.constraints {
        if !constraint.applies_to(&parameter.kind) {
            errors.push(SchemaError::ConstraintNotApplicable {
                parameter: name.to_string(),
                kind: parameter.kind.label(),
            });
        }
    }
}

fn validate_default(parameter: &ParameterSchema, errors: &mut Vec<SchemaError>) {
    let Some(raw) = &parameter.default else {
        return;
    };
    let name = parameter.primary_name();

    if parameter.mandatory {
        errors.push(SchemaError::MandatoryWithDefault(name.to_string()));
        return;
    }

    match coerce(&parameter.kind, raw) {
        Ok(value) => {
            if let Some(failed) = parameter.constraints.iter().find(|c| !c.check(&value)) {
                errors.push(SchemaError::DefaultViolatesConstraint {
                    parameter: name.to_string(),
                    message: failed.message_for(name),
                });
            }
        }
        Err(err) => errors.push(SchemaError::InvalidDefault {
            parameter: name.to_string(),
            reason: err.to_string(),
        }),
    }
}
