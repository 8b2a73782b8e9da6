//! Output sinks for help requests and parse errors.
//!
//! The parser never writes to a console itself. When a parse is handled or
//! fails it hands the help data or the error to a [`Reporter`], and the
//! embedding program decides how to present it.

use command_binder_core::Help;
use tracing::{info, warn};

use crate::error::ParseError;

/// Receives help data and parse errors produced by a parser.
pub trait Reporter {
    fn help(&self, help: &Help);
    fn error(&self, error: &ParseError);
}

/// Discards everything. The default reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn help(&self, _help: &Help) {}
    fn error(&self, _error: &ParseError) {}
}

/// Emits help requests at `info` and parse errors at `warn` through
/// `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn help(&self, help: &Help) {
        match help {
            Help::Context(context) => info!(
                commands = context.commands.len(),
                parameters = context.parameters.len(),
                "Help requested"
            ),
            Help::Command(command) => info!(
                command = %command.name,
                parameters = command.parameters.len(),
                "Help requested for command"
            ),
        }
    }

    fn error(&self, error: &ParseError) {
        warn!(kind = ?error.kind, subject = %error.subject, "{}", error.message);
    }
}
