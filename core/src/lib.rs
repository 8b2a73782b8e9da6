//! Core schema types for declarative command-line binding.
//!
//! This crate defines the metadata model consumed by the `command-binder`
//! parser:
//!
//! - [`ContextSchema`] — root of a program's command surface, with an
//!   optional default command, included commands and [`ContextOptions`].
//! - [`CommandSchema`] — a named command with parameters and nested commands.
//! - [`ParameterSchema`] — a named and optionally positional binding target
//!   with a [`ParameterKind`], mandatory flag, default and [`Constraint`]s.
//!
//! Validation ([`validate_context`]) catches configuration mistakes such as
//! invalid names, a default command that is also included, or defaults that
//! violate their own constraints.
//!
//! Coercion ([`coerce`]) turns raw strings into typed [`Value`]s, and the
//! [`help`] module produces the data a help formatter needs.
//!
//! # Example
//!
//! ```
//! use command_binder_core::*;
//!
//! let context = ContextSchema::new()
//!     .with_description("A fictional backup tool")
//!     .with_default_command(
//!         CommandSchema::default()
//!             .with_parameter(ParameterSchema::int("int").mandatory())
//!             .with_parameter(ParameterSchema::switch("sw")),
//!     )
//!     .with_command(
//!         CommandSchema::new("restore")
//!             .with_parameter(ParameterSchema::new(
//!                 ["p"],
//!                 ParameterKind::enumeration(["None", "Windows", "Unix", "Linux"]),
//!             )),
//!     );
//!
//! assert!(validate_context(&context).is_empty());
//! assert_eq!(context.find_command("restore").unwrap().parameters.len(), 1);
//! ```

mod constraint;
pub mod help;
mod types;
mod validate;
mod value;

pub use constraint::{Constraint, ConstraintRule};
pub use help::{
    CommandHelpContext, CommandSummary, Help, HelpContext, ParameterHelp, command_help_context,
    help_context,
};
pub use types::*;
pub use validate::{
    MAX_COMMAND_DEPTH, SchemaError, is_valid_name, validate_command, validate_context,
};
pub use value::{CoerceError, Value, coerce, split_list};
