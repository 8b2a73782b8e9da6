//! Output formatting for parse outcomes and help.

use std::collections::BTreeMap;

use command_binder::{BoundCommand, ParseError, ParsingResult};
use command_binder_core::{CommandSummary, Help, ParameterHelp, Value};
use serde::Serialize;

/// Supported machine-readable output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Serializable form of a parse outcome.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ParseOutcome {
    Success {
        command: Vec<String>,
        is_default: bool,
        values: BTreeMap<String, Value>,
    },
    Handled {
        help: Help,
    },
    Failure {
        error: ParseError,
    },
}

impl ParseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

impl From<ParsingResult<BoundCommand>> for ParseOutcome {
    fn from(result: ParsingResult<BoundCommand>) -> Self {
        match result {
            ParsingResult::Success(bound) => Self::Success {
                command: bound.path,
                is_default: bound.is_default,
                values: bound.values,
            },
            ParsingResult::Handled(help) => Self::Handled { help },
            ParsingResult::Failure(error) => Self::Failure { error },
        }
    }
}

/// Formats a parse outcome in the requested output format.
pub fn format_outcome(outcome: &ParseOutcome, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(outcome)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(outcome).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Renders help data as plain text.
pub fn help_to_text(help: &Help) -> String {
    let mut out = String::new();

    let (title, description, commands, parameters) = match help {
        Help::Context(context) => (
            None,
            context.description.as_deref(),
            &context.commands,
            &context.parameters,
        ),
        Help::Command(command) => (
            Some(command.name.as_str()),
            command.description.as_deref(),
            &command.commands,
            &command.parameters,
        ),
    };

    if let Some(name) = title {
        out.push_str(&format!("Command: {name}\n"));
    }
    if let Some(desc) = description {
        out.push_str(&format!("  {desc}\n"));
    }

    push_commands(&mut out, commands);
    push_parameters(&mut out, parameters);

    out
}

fn push_commands(out: &mut String, commands: &[CommandSummary]) {
    if commands.is_empty() {
        return;
    }

    out.push_str("\nCommands:\n");
    let width = commands.iter().map(|c| c.name.len()).max().unwrap_or(4);
    for command in commands {
        let desc = command.description.as_deref().unwrap_or("");
        out.push_str(&format!("  {:<width$}  {desc}\n", command.name));
    }
}

fn push_parameters(out: &mut String, parameters: &[ParameterHelp]) {
    if parameters.is_empty() {
        return;
    }

    out.push_str("\nParameters:\n");
    let width = parameters
        .iter()
        .map(|p| p.full_name.len())
        .max()
        .unwrap_or(4);
    for parameter in parameters {
        let mut notes = Vec::new();
        notes.push(parameter.kind.label().to_string());
        if parameter.mandatory {
            notes.push("mandatory".to_string());
        }
        if let Some(position) = parameter.position {
            notes.push(format!("position {position}"));
        }
        if let Some(ref default) = parameter.default {
            notes.push(format!("default: {default}"));
        }
        let members = parameter.kind.members();
        if !members.is_empty() {
            let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
            notes.push(format!("one of: {}", names.join("|")));
        }

        let desc = parameter.description.as_deref().unwrap_or("");
        out.push_str(&format!(
            "  {:<width$}  {desc} ({})\n",
            parameter.full_name,
            notes.join(", ")
        ));
    }
}
