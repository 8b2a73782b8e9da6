//! Typed command declarations.
//!
//! A program describes its command surface with Rust types: a [`Context`]
//! names its default and included commands, and every [`Command`] declares
//! its parameters and nested commands and knows how to receive bound
//! values. The parser resolves a command, creates a fresh instance with
//! `Default`, assigns each bound value and hands back a `Box<dyn Command>`
//! that can be downcast to the concrete type.

use std::any::{Any, TypeId};
use std::fmt;

use command_binder_core::{CommandSchema, ContextOptions, ParameterSchema, SchemaError, Value};

use crate::error::ParseError;

/// A command that values can be bound onto.
///
/// # Examples
///
/// ```
/// use command_binder::{Command, CommandDeclaration};
/// use command_binder_core::{ParameterSchema, SchemaError, Value};
///
/// #[derive(Default)]
/// struct Restore {
///     an: bool,
/// }
///
/// impl Command for Restore {
///     fn declare() -> CommandDeclaration {
///         CommandDeclaration::new("restore").with_parameter(ParameterSchema::switch("an"))
///     }
///
///     fn assign(&mut self, parameter: &str, value: Value) -> Result<(), SchemaError> {
///         match parameter {
///             "an" => self.an = value.try_into()?,
///             other => return Err(SchemaError::UnknownParameter(other.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// let mut restore = Restore::default();
/// restore.assign("an", Value::Switch(true)).unwrap();
/// assert!(restore.an);
/// ```
pub trait Command: Any {
    /// Declares the command's name, parameters and nested commands.
    fn declare() -> CommandDeclaration
    where
        Self: Sized;

    /// Receives the value bound to the parameter with the given primary
    /// name.
    fn assign(&mut self, parameter: &str, value: Value) -> Result<(), SchemaError>;

    /// Called after binding when the context enables hooks. An error fails
    /// the parse.
    fn on_parsed(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

impl dyn Command {
    /// Returns `true` if the command is a `T`.
    pub fn is<T: Command>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    pub fn downcast_mut<T: Command>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }

    /// Converts the box for `Box<dyn Any>::downcast`.
    pub fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").finish_non_exhaustive()
    }
}

fn create<T: Command + Default>() -> Box<dyn Command> {
    Box::new(T::default())
}

/// Type-erased handle to a [`Command`] type.
#[derive(Clone, Copy)]
pub struct CommandType {
    id: TypeId,
    type_name: &'static str,
    declare: fn() -> CommandDeclaration,
    create: fn() -> Box<dyn Command>,
}

impl CommandType {
    pub fn of<T: Command + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            declare: T::declare,
            create: create::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn declare(&self) -> CommandDeclaration {
        (self.declare)()
    }

    /// Creates a fresh default instance.
    pub fn create(&self) -> Box<dyn Command> {
        (self.create)()
    }
}

impl fmt::Debug for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandType").field(&self.type_name).finish()
    }
}

impl PartialEq for CommandType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommandType {}

/// What a [`Command`] declares about itself.
#[derive(Debug, Clone)]
pub struct CommandDeclaration {
    pub(crate) schema: CommandSchema,
    pub(crate) commands: Vec<CommandType>,
}

impl CommandDeclaration {
    pub fn new(name: &str) -> Self {
        Self {
            schema: CommandSchema::new(name),
            commands: Vec::new(),
        }
    }

    /// A declaration without a name, for default commands.
    pub fn unnamed() -> Self {
        Self::new("")
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.schema = self.schema.with_description(desc);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.schema = self.schema.with_parameter(parameter);
        self
    }

    /// Adds a nested command type.
    pub fn with_command<T: Command + Default>(mut self) -> Self {
        self.commands.push(CommandType::of::<T>());
        self
    }

    /// The declared schema, without nested commands.
    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub fn commands(&self) -> &[CommandType] {
        &self.commands
    }
}

/// A program's command surface, declared as types.
pub trait Context: 'static {
    fn declare() -> ContextDeclaration;
}

/// What a [`Context`] declares.
#[derive(Debug, Clone, Default)]
pub struct ContextDeclaration {
    pub(crate) description: Option<String>,
    pub(crate) options: ContextOptions,
    pub(crate) default_command: Option<CommandType>,
    pub(crate) commands: Vec<CommandType>,
}

impl ContextDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_default_command<T: Command + Default>(mut self) -> Self {
        self.default_command = Some(CommandType::of::<T>());
        self
    }

    pub fn with_command<T: Command + Default>(mut self) -> Self {
        self.commands.push(CommandType::of::<T>());
        self
    }
}
