//! Schema type definitions for declarative command-line binding.
//!
//! A [`ContextSchema`] is the root of a program's command surface. It owns an
//! optional default command and a list of included commands, each of which is
//! a [`CommandSchema`] with its own [`ParameterSchema`] list and nested
//! commands. The types are plain data: they serialize with [`serde`], can be
//! shared read-only across concurrent parses, and are never mutated while
//! parsing.

use serde::{Deserialize, Serialize};

use crate::Constraint;

/// Default prefix for value-bearing options (e.g. `-name value`).
pub const DEFAULT_OPTION_PREFIX: &str = "-";

/// Default prefix for boolean switches (e.g. `--verbose`).
pub const DEFAULT_SWITCH_PREFIX: &str = "--";

/// One member of an enum or flags-enum parameter.
///
/// `value` is the underlying integer of the member. For flags-enums the
/// bound value is the bitwise OR of the selected members' values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(default)]
    pub value: i64,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Kind of a parameter, fixed when the schema is built.
///
/// The binder dispatches on this tag with a single exhaustive match, so the
/// target type of a parameter is never inspected again while parsing.
///
/// # Examples
///
/// ```
/// use command_binder_core::{EnumMember, ParameterKind};
///
/// let kind = ParameterKind::Flags {
///     members: vec![EnumMember::new("Windows", 1), EnumMember::new("Linux", 4)],
/// };
/// assert!(kind.takes_value());
/// assert_eq!(kind.members().len(), 2);
/// assert!(!ParameterKind::Switch.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    /// Raw string value (the default).
    #[default]
    String,
    /// Base-10 integer.
    Int,
    /// Boolean flag; presence means `true`.
    Switch,
    /// Comma-separated list of strings.
    StringArray,
    /// Exactly one of the declared members.
    Enum { members: Vec<EnumMember> },
    /// Comma-separated combination of the declared members.
    Flags { members: Vec<EnumMember> },
}

impl ParameterKind {
    /// Builds an [`Enum`](ParameterKind::Enum) kind whose member values are
    /// their declaration indexes.
    pub fn enumeration<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            members: names
                .into_iter()
                .enumerate()
                .map(|(index, name)| EnumMember::new(name, index as i64))
                .collect(),
        }
    }

    /// Builds a [`Flags`](ParameterKind::Flags) kind from `(name, bits)` pairs.
    pub fn flags<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self::Flags {
            members: members
                .into_iter()
                .map(|(name, value)| EnumMember::new(name, value))
                .collect(),
        }
    }

    /// Whether a token bound to this kind must carry a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Switch)
    }

    /// Valid members for enum and flags kinds; empty otherwise.
    pub fn members(&self) -> &[EnumMember] {
        match self {
            Self::Enum { members } | Self::Flags { members } => members,
            _ => &[],
        }
    }

    /// Short lowercase label used in help output and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Switch => "switch",
            Self::StringArray => "string-array",
            Self::Enum { .. } => "enum",
            Self::Flags { .. } => "flags",
        }
    }
}

/// Declaration of a single bindable parameter.
///
/// A parameter has one or more names (aliases), the first of which is its
/// primary name. Named tokens match a name exactly after the prefix is
/// stripped. A parameter with a `position` can also be bound from leading
/// bare words.
///
/// # Examples
///
/// ```
/// use command_binder_core::{Constraint, ParameterKind, ParameterSchema};
///
/// let param = ParameterSchema::new(["s1", "s2"], ParameterKind::String)
///     .with_description("second string");
/// assert_eq!(param.primary_name(), "s1");
/// assert!(param.matches("s2"));
///
/// let jobs = ParameterSchema::new(["jobs", "j"], ParameterKind::Int)
///     .with_default("4")
///     .with_constraint(Constraint::range(1, 64));
/// assert!(!jobs.mandatory);
/// assert_eq!(jobs.default.as_deref(), Some("4"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Names of the parameter; the first is the primary name.
    pub names: Vec<String>,
    /// Kind of value this parameter binds to.
    #[serde(default)]
    pub kind: ParameterKind,
    /// Whether parsing fails when the parameter is absent.
    #[serde(default)]
    pub mandatory: bool,
    /// Position for positional binding (ordering key, not an index).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Raw default applied when an optional parameter is never set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Constraints evaluated after coercion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl ParameterSchema {
    /// Creates a parameter with the given names and kind.
    pub fn new<I, S>(names: I, kind: ParameterKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            kind,
            mandatory: false,
            position: None,
            default: None,
            description: None,
            constraints: Vec::new(),
        }
    }

    /// Creates a parameter from a comma-separated name list (`"s1,s2"`).
    ///
    /// Names are kept verbatim, including surrounding whitespace, so that
    /// validation can reject `"my, some"` instead of silently trimming it.
    pub fn from_names(names: &str, kind: ParameterKind) -> Self {
        Self::new(names.split(','), kind)
    }

    /// Creates a string parameter.
    pub fn string(name: &str) -> Self {
        Self::from_names(name, ParameterKind::String)
    }

    /// Creates an integer parameter.
    pub fn int(name: &str) -> Self {
        Self::from_names(name, ParameterKind::Int)
    }

    /// Creates a switch parameter.
    pub fn switch(name: &str) -> Self {
        Self::from_names(name, ParameterKind::Switch)
    }

    /// Creates a string-array parameter.
    pub fn string_array(name: &str) -> Self {
        Self::from_names(name, ParameterKind::StringArray)
    }

    /// Marks the parameter as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Sets the positional ordering key.
    pub fn at_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the raw default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns the first declared name.
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("unknown")
    }

    /// Checks whether `name` (prefix already stripped) is one of this
    /// parameter's names. Matching is exact.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Declaration of a command and its nested commands.
///
/// # Examples
///
/// ```
/// use command_binder_core::{CommandSchema, ParameterSchema};
///
/// let restore = CommandSchema::new("restore")
///     .with_description("restores something from there")
///     .with_parameter(ParameterSchema::switch("an"))
///     .with_command(CommandSchema::new("restore-sub"));
///
/// assert!(restore.find_command("RESTORE-SUB").is_some());
/// assert!(restore.find_parameter("an").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Name used to select the command on the command line.
    pub name: String,
    /// Short description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters bound on this command.
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
    /// Nested commands.
    #[serde(default)]
    pub commands: Vec<CommandSchema>,
}

impl CommandSchema {
    /// Creates a command with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a nested command.
    pub fn with_command(mut self, command: CommandSchema) -> Self {
        self.commands.push(command);
        self
    }

    /// Finds a nested command by name, case-insensitively. The first
    /// declared match wins.
    pub fn find_command(&self, name: &str) -> Option<&CommandSchema> {
        find_command_in(&self.commands, name).map(|(_, c)| c)
    }

    /// Finds a parameter by any of its names.
    pub fn find_parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.matches(name))
    }

    /// Parameters that can be bound positionally, ordered by position.
    pub fn positional_parameters(&self) -> Vec<&ParameterSchema> {
        let mut positional: Vec<&ParameterSchema> = self
            .parameters
            .iter()
            .filter(|p| p.position.is_some())
            .collect();
        positional.sort_by_key(|p| p.position);
        positional
    }
}

/// Finds a command among siblings, case-insensitively, returning its index.
pub fn find_command_in<'a>(
    commands: &'a [CommandSchema],
    name: &str,
) -> Option<(usize, &'a CommandSchema)> {
    commands
        .iter()
        .enumerate()
        .find(|(_, c)| c.name.eq_ignore_ascii_case(name))
}

/// Policy for a first command word that matches no declared command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCommandPolicy {
    /// Fail with an `InvalidCommand` parse error (the default).
    #[default]
    Error,
    /// Treat the invocation as a help request for the root context.
    Help,
}

/// Option and switch prefixes used by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    pub option: String,
    pub switch: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            option: DEFAULT_OPTION_PREFIX.to_string(),
            switch: DEFAULT_SWITCH_PREFIX.to_string(),
        }
    }
}

impl Prefixes {
    /// Prefix used to spell a parameter of the given kind.
    pub fn for_kind(&self, kind: &ParameterKind) -> &str {
        match kind {
            ParameterKind::Switch => &self.switch,
            _ => &self.option,
        }
    }
}

/// Options controlling how a context is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContextOptions {
    /// Invoke the resolved command's post-parse hook.
    pub invoke_hooks: bool,
    /// Treat an empty argument vector as a help request.
    pub empty_input_as_help: bool,
    /// What to do when the first command word is unknown.
    pub unknown_command: UnknownCommandPolicy,
    /// Allow bare words after named parameters to fill positional slots.
    pub trailing_positionals: bool,
    /// Option and switch prefixes.
    pub prefixes: Prefixes,
}

/// Root schema of a program's command surface.
///
/// # Examples
///
/// ```
/// use command_binder_core::*;
///
/// let context = ContextSchema::new()
///     .with_description("backup tool v1.0")
///     .with_default_command(
///         CommandSchema::new("default").with_parameter(ParameterSchema::int("int").mandatory()),
///     )
///     .with_command(CommandSchema::new("restore"));
///
/// assert!(context.find_command("restore").is_some());
/// assert!(validate_context(&context).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextSchema {
    /// Program description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command used when no command word is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_command: Option<CommandSchema>,
    /// Top-level commands.
    #[serde(default)]
    pub commands: Vec<CommandSchema>,
    /// Parsing options.
    #[serde(default)]
    pub options: ContextOptions,
}

impl ContextSchema {
    /// Creates an empty context. At least one command must be added before
    /// it validates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the default command.
    pub fn with_default_command(mut self, command: CommandSchema) -> Self {
        self.default_command = Some(command);
        self
    }

    /// Adds a top-level command.
    pub fn with_command(mut self, command: CommandSchema) -> Self {
        self.commands.push(command);
        self
    }

    /// Replaces the parsing options.
    pub fn with_options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    /// Finds a top-level command by name, case-insensitively.
    pub fn find_command(&self, name: &str) -> Option<&CommandSchema> {
        find_command_in(&self.commands, name).map(|(_, c)| c)
    }

    /// Follows a path of child indexes from the top-level commands.
    pub fn command_at(&self, path: &[usize]) -> Option<&CommandSchema> {
        let (first, rest) = path.split_first()?;
        let mut current = self.commands.get(*first)?;
        for index in rest {
            current = current.commands.get(*index)?;
        }
        Some(current)
    }

    /// Follows a path of command names, case-insensitively.
    pub fn command_by_names<S: AsRef<str>>(&self, names: &[S]) -> Option<&CommandSchema> {
        let (first, rest) = names.split_first()?;
        let mut current = self.find_command(first.as_ref())?;
        for name in rest {
            current = current.find_command(name.as_ref())?;
        }
        Some(current)
    }
}
