//! Declarative command-line parsing and binding.
//!
//! A parse runs in four steps:
//!
//! 1. [`Lexer`] classifies raw arguments into command words, options,
//!    switches and data.
//! 2. [`resolve`] walks the leading command words down the command tree.
//! 3. Help literals (`-h`, `--h`, `--help`) short-circuit into a
//!    [`ParsingResult::Handled`] carrying help data.
//! 4. [`Binder`] binds the remaining tokens onto the resolved command's
//!    parameters, checks mandatory parameters and applies defaults.
//!
//! Programs either declare their commands as Rust types ([`Context`],
//! [`Command`]) and use [`CommandLineParser`], or build a
//! [`ContextSchema`](command_binder_core::ContextSchema) value and use
//! [`SchemaParser`].
//!
//! Bad input never panics or returns `Err`: it becomes a
//! [`ParsingResult::Failure`] and is handed to the configured
//! [`Reporter`]. Only schema mistakes are returned as errors.
//!
//! # Example
//!
//! ```
//! use command_binder::{ParseErrorKind, SchemaParser};
//! use command_binder_core::*;
//!
//! let context = ContextSchema::new()
//!     .with_default_command(
//!         CommandSchema::default()
//!             .with_parameter(ParameterSchema::string("my"))
//!             .with_parameter(ParameterSchema::int("int").mandatory()),
//!     )
//!     .with_command(CommandSchema::new("restore").with_parameter(ParameterSchema::switch("an")));
//!
//! let parser = SchemaParser::new(context).unwrap();
//!
//! let bound = parser.parse(&["-my", "some", "-int", "3"]).unwrap().into_success().unwrap();
//! assert_eq!(bound.get_str("my"), Some("some"));
//!
//! let result = parser.parse(&["restore", "--an", "-int", "3"]).unwrap();
//! assert_eq!(result.error().unwrap().kind, ParseErrorKind::InvalidParameter);
//! ```

mod bind;
mod cache;
mod command;
mod engine;
mod error;
mod lexer;
mod parser;
mod reporter;
mod resolve;
mod result;
mod shell;

pub use bind::{Binder, Binding};
pub use cache::{CompiledContext, SchemaCache};
pub use command::{Command, CommandDeclaration, CommandType, Context, ContextDeclaration};
pub use error::{Error, ParseError, ParseErrorKind};
pub use lexer::{HELP_TRIGGERS, Lexer, Token, TokenKind, is_help_trigger};
pub use parser::{BoundCommand, CommandLineParser, SchemaParser};
pub use reporter::{Reporter, SilentReporter, TracingReporter};
pub use resolve::{Resolution, resolve};
pub use result::{ParsingResult, ParsingResultKind};
pub use shell::split_command_line;
