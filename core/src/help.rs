//! Help data generated from schemas.
//!
//! Rendering is left to the caller; these types only carry what a formatter
//! needs: descriptions, the ordered parameter list and nested commands.

use serde::{Deserialize, Serialize};

use crate::{CommandSchema, ContextSchema, ParameterKind, ParameterSchema, Prefixes};

/// Help entry for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterHelp {
    /// Every alias with its prefix, comma-joined (e.g. `-s1,-s2`).
    pub full_name: String,
    pub kind: ParameterKind,
    pub description: Option<String>,
    pub mandatory: bool,
    pub position: Option<u32>,
    pub default: Option<String>,
}

/// Name and description of a nested command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    pub name: String,
    pub description: Option<String>,
}

/// Help for the root context: program description, the default command's
/// parameters and the top-level commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpContext {
    pub description: Option<String>,
    pub parameters: Vec<ParameterHelp>,
    pub commands: Vec<CommandSummary>,
}

/// Help for a specific command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHelpContext {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterHelp>,
    pub commands: Vec<CommandSummary>,
}

/// Help produced by a parse that was handled instead of completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Help {
    Context(HelpContext),
    Command(CommandHelpContext),
}

/// Generates root help for a context.
///
/// # Examples
///
/// ```
/// use command_binder_core::*;
///
/// let context = ContextSchema::new()
///     .with_description("some program v1.0")
///     .with_default_command(
///         CommandSchema::default().with_parameter(ParameterSchema::string("s1,s2")),
///     )
///     .with_command(CommandSchema::new("restore").with_description("restores"));
///
/// let help = help_context(&context);
/// assert_eq!(help.parameters[0].full_name, "-s1,-s2");
/// assert_eq!(help.commands[0].name, "restore");
/// ```
pub fn help_context(context: &ContextSchema) -> HelpContext {
    let prefixes = &context.options.prefixes;
    HelpContext {
        description: context.description.clone(),
        parameters: context
            .default_command
            .as_ref()
            .map(|c| parameter_help(&c.parameters, prefixes))
            .unwrap_or_default(),
        commands: summaries(&context.commands),
    }
}

/// Generates help for a single command.
pub fn command_help_context(command: &CommandSchema, prefixes: &Prefixes) -> CommandHelpContext {
    CommandHelpContext {
        name: command.name.clone(),
        description: command.description.clone(),
        parameters: parameter_help(&command.parameters, prefixes),
        commands: summaries(&command.commands),
    }
}

/// Joins every name of a parameter with the prefix matching its kind.
pub fn full_name(parameter: &ParameterSchema, prefixes: &Prefixes) -> String {
    let prefix = prefixes.for_kind(&parameter.kind);
    parameter
        .names
        .iter()
        .map(|name| format!("{prefix}{name}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn parameter_help(parameters: &[ParameterSchema], prefixes: &Prefixes) -> Vec<ParameterHelp> {
    parameters
        .iter()
        .map(|p| ParameterHelp {
            full_name: full_name(p, prefixes),
            kind: p.kind.clone(),
            description: p.description.clone(),
            mandatory: p.mandatory,
            position: p.position,
            default: p.default.clone(),
        })
        .collect()
}

fn summaries(commands: &[CommandSchema]) -> Vec<CommandSummary> {
    commands
        .iter()
        .map(|c| CommandSummary {
            name: c.name.clone(),
            description: c.description.clone(),
        })
        .collect()
}
