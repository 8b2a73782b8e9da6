//! Parse entrypoints.
//!
//! [`CommandLineParser`] binds onto typed commands declared through a
//! [`Context`]; [`SchemaParser`] runs on a [`ContextSchema`] value (for
//! example one loaded from a file) and returns the bound values by name.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use command_binder_core::{
    CommandHelpContext, ContextSchema, HelpContext, SchemaError, Value, help, validate_context,
};
use serde::Serialize;
use tracing::debug;

use crate::cache::{CompiledContext, SchemaCache};
use crate::command::{Command, Context};
use crate::engine::{self, Bound};
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::reporter::{Reporter, SilentReporter};
use crate::result::ParsingResult;
use crate::shell::split_command_line;

/// Reports handled and failed outcomes and separates schema errors out.
fn settle<T>(
    reporter: &dyn Reporter,
    outcome: Result<ParsingResult<T>, Error>,
) -> Result<ParsingResult<T>, SchemaError> {
    match outcome {
        Ok(ParsingResult::Handled(help)) => {
            reporter.help(&help);
            Ok(ParsingResult::Handled(help))
        }
        Ok(result) => Ok(result),
        Err(Error::Parse(err)) => {
            reporter.error(&err);
            Ok(ParsingResult::Failure(err))
        }
        Err(Error::Schema(err)) => Err(err),
    }
}

/// Parser for a typed [`Context`].
///
/// # Examples
///
/// ```
/// use command_binder::*;
/// use command_binder_core::{ParameterSchema, SchemaError, Value};
///
/// #[derive(Debug, Default)]
/// struct Build {
///     jobs: i64,
///     release: bool,
/// }
///
/// impl Command for Build {
///     fn declare() -> CommandDeclaration {
///         CommandDeclaration::new("build")
///             .with_parameter(ParameterSchema::int("jobs,j").with_default("1"))
///             .with_parameter(ParameterSchema::switch("release"))
///     }
///
///     fn assign(&mut self, parameter: &str, value: Value) -> Result<(), SchemaError> {
///         match parameter {
///             "jobs" => self.jobs = value.try_into()?,
///             "release" => self.release = value.try_into()?,
///             other => return Err(SchemaError::UnknownParameter(other.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// struct Tool;
///
/// impl Context for Tool {
///     fn declare() -> ContextDeclaration {
///         ContextDeclaration::new().with_command::<Build>()
///     }
/// }
///
/// let parser = CommandLineParser::<Tool>::new();
/// let command = parser.try_parse(&["build", "-j", "8", "--release"]).unwrap().unwrap();
/// let build = command.downcast_ref::<Build>().unwrap();
/// assert_eq!(build.jobs, 8);
/// assert!(build.release);
/// ```
pub struct CommandLineParser<C: Context> {
    cache: Arc<SchemaCache>,
    reporter: Box<dyn Reporter>,
    context: PhantomData<fn() -> C>,
}

impl<C: Context> Default for CommandLineParser<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> CommandLineParser<C> {
    pub fn new() -> Self {
        Self {
            cache: SchemaCache::global(),
            reporter: Box::new(SilentReporter),
            context: PhantomData,
        }
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Uses `cache` instead of the process-wide one.
    pub fn with_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Parses an argument vector.
    ///
    /// Returns `Err` only for schema mistakes; bad input is a
    /// [`ParsingResult::Failure`] and has already been reported.
    pub fn parse<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<ParsingResult<Box<dyn Command>>, SchemaError> {
        let compiled = self.cache.context::<C>()?;
        settle(self.reporter.as_ref(), instantiate(&compiled, args))
    }

    /// Splits a raw command line shell-style, then parses it.
    pub fn parse_line(&self, line: &str) -> Result<ParsingResult<Box<dyn Command>>, SchemaError> {
        self.parse(&split_command_line(line))
    }

    /// Like [`parse`](Self::parse), but with parse errors as `Err` and
    /// handled help as `Ok(None)`.
    pub fn try_parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Option<Box<dyn Command>>, Error> {
        match self.parse(args)? {
            ParsingResult::Success(command) => Ok(Some(command)),
            ParsingResult::Handled(_) => Ok(None),
            ParsingResult::Failure(err) => Err(err.into()),
        }
    }

    pub fn help_context(&self) -> Result<HelpContext, SchemaError> {
        let compiled = self.cache.context::<C>()?;
        Ok(help::help_context(compiled.schema()))
    }

    /// Help for the command at a path of command names, if it exists.
    pub fn command_help_context<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Option<CommandHelpContext>, SchemaError> {
        let compiled = self.cache.context::<C>()?;
        let schema = compiled.schema();
        Ok(schema
            .command_by_names(names)
            .map(|command| help::command_help_context(command, &schema.options.prefixes)))
    }
}

fn instantiate<S: AsRef<str>>(
    compiled: &CompiledContext,
    args: &[S],
) -> Result<ParsingResult<Box<dyn Command>>, Error> {
    let bound = match engine::run(compiled.schema(), args)? {
        ParsingResult::Success(bound) => bound,
        ParsingResult::Handled(help) => return Ok(ParsingResult::Handled(help)),
        ParsingResult::Failure(err) => return Err(err.into()),
    };

    let ty = compiled
        .command_type(&bound.resolution)
        .ok_or_else(|| ParseError::new(ParseErrorKind::Invalid, ""))?;
    debug!(command = ty.type_name(), "Creating command");

    let mut command = ty.create();
    for binding in bound.bindings {
        command.assign(&binding.parameter, binding.value)?;
    }

    if compiled.schema().options.invoke_hooks {
        debug!(command = ty.type_name(), "Invoking post-parse hook");
        command.on_parsed()?;
    }

    Ok(ParsingResult::Success(command))
}

/// Values bound by a [`SchemaParser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundCommand {
    /// Names of the resolved command path; empty for the default command.
    pub path: Vec<String>,
    pub is_default: bool,
    /// Bound values keyed by primary parameter name.
    pub values: BTreeMap<String, Value>,
}

impl BoundCommand {
    fn new(context: &ContextSchema, bound: Bound) -> Self {
        Self {
            path: bound.resolution.names(context),
            is_default: bound.resolution.is_default,
            values: bound
                .bindings
                .into_iter()
                .map(|b| (b.parameter, b.value))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_strings(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_strings)
    }

    /// Whether a switch was given.
    pub fn switch(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_switch).unwrap_or(false)
    }
}

/// Parser over a [`ContextSchema`] value.
///
/// # Examples
///
/// ```
/// use command_binder::SchemaParser;
/// use command_binder_core::*;
///
/// let context = ContextSchema::new().with_command(
///     CommandSchema::new("restore").with_parameter(ParameterSchema::switch("an")),
/// );
/// let parser = SchemaParser::new(context).unwrap();
///
/// let bound = parser.parse(&["restore", "--an"]).unwrap().into_success().unwrap();
/// assert_eq!(bound.path, vec!["restore"]);
/// assert!(bound.switch("an"));
/// ```
pub struct SchemaParser {
    context: ContextSchema,
    reporter: Box<dyn Reporter>,
}

impl SchemaParser {
    /// Validates `context`, failing with the first schema error.
    pub fn new(context: ContextSchema) -> Result<Self, SchemaError> {
        if let Some(err) = validate_context(&context).into_iter().next() {
            return Err(err);
        }
        Ok(Self {
            context,
            reporter: Box::new(SilentReporter),
        })
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn context(&self) -> &ContextSchema {
        &self.context
    }

    pub fn parse<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<ParsingResult<BoundCommand>, SchemaError> {
        let outcome = engine::run(&self.context, args)
            .map(|result| result.map(|bound| BoundCommand::new(&self.context, bound)));
        settle(self.reporter.as_ref(), outcome)
    }

    pub fn parse_line(&self, line: &str) -> Result<ParsingResult<BoundCommand>, SchemaError> {
        self.parse(&split_command_line(line))
    }

    pub fn help_context(&self) -> HelpContext {
        help::help_context(&self.context)
    }

    pub fn command_help_context<S: AsRef<str>>(&self, names: &[S]) -> Option<CommandHelpContext> {
        self.context
            .command_by_names(names)
            .map(|command| help::command_help_context(command, &self.context.options.prefixes))
    }
}
