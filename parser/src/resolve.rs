//! Command resolution over the leading command words of a token stream.

use command_binder_core::{CommandSchema, ContextSchema, find_command_in};
use serde::Serialize;
use tracing::debug;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};

/// Where resolution ended up.
///
/// `path` holds child indexes from the context's top-level commands down to
/// the resolved command and is empty when the default command was selected.
/// Tokens from `offset` on belong to the resolved command; a command word in
/// that range is bound as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: Vec<usize>,
    pub is_default: bool,
    pub offset: usize,
}

impl Resolution {
    fn default_command() -> Self {
        Self {
            path: Vec::new(),
            is_default: true,
            offset: 0,
        }
    }

    /// The resolved command schema.
    pub fn command<'c>(&self, context: &'c ContextSchema) -> Option<&'c CommandSchema> {
        if self.is_default {
            context.default_command.as_ref()
        } else {
            context.command_at(&self.path)
        }
    }

    /// Names of the commands along the path.
    pub fn names(&self, context: &ContextSchema) -> Vec<String> {
        let mut names = Vec::with_capacity(self.path.len());
        let mut level = context.commands.as_slice();
        for &index in &self.path {
            let Some(command) = level.get(index) else {
                break;
            };
            names.push(command.name.clone());
            level = &command.commands;
        }
        names
    }
}

/// Resolves which command `tokens` invoke.
///
/// Leading command words are matched case-insensitively against the
/// current level, descending on every match. The first word that matches
/// nothing ends the walk; after at least one match it simply becomes data
/// for the resolved command.
pub fn resolve(tokens: &[Token], context: &ContextSchema) -> Result<Resolution, ParseError> {
    let mut path = Vec::new();
    let mut level = context.commands.as_slice();
    let mut offset = 0;

    while let Some(token) = tokens.get(offset) {
        if token.kind != TokenKind::Command {
            break;
        }
        let Some((index, command)) = find_command_in(level, &token.raw) else {
            break;
        };
        path.push(index);
        level = &command.commands;
        offset += 1;
    }

    if !path.is_empty() {
        debug!(depth = path.len(), offset, "Resolved command path");
        return Ok(Resolution {
            path,
            is_default: false,
            offset,
        });
    }

    match (tokens.first(), &context.default_command) {
        (Some(token), default) if token.kind == TokenKind::Command => match default {
            Some(command) if !command.positional_parameters().is_empty() => {
                debug!(word = %token.raw, "Unknown word bound to default command");
                Ok(Resolution::default_command())
            }
            _ => Err(ParseError::new(ParseErrorKind::InvalidCommand, &token.raw)),
        },
        (_, Some(_)) => Ok(Resolution::default_command()),
        (_, None) => Err(ParseError::new(ParseErrorKind::NoCommand, "")),
    }
}
