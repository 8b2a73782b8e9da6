use command_binder_core::{ContextSchema, Help, UnknownCommandPolicy, help};
use tracing::debug;

use crate::bind::{Binder, Binding};
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, is_help_trigger};
use crate::resolve::{Resolution, resolve};
use crate::result::ParsingResult;

/// Output of a successful run: the resolved command and its bindings.
#[derive(Debug)]
pub(crate) struct Bound {
    pub resolution: Resolution,
    pub bindings: Vec<Binding>,
}

fn root_help(context: &ContextSchema) -> Help {
    Help::Context(help::help_context(context))
}

/// Help for the resolved command, or the root help for the default command.
fn resolved_help(context: &ContextSchema, resolution: &Resolution) -> Help {
    match resolution.command(context) {
        Some(command) if !resolution.is_default => {
            Help::Command(help::command_help_context(command, &context.options.prefixes))
        }
        _ => root_help(context),
    }
}

/// Help for an argument list that failed to lex but contains a help literal.
fn help_after_lex_failure<S: AsRef<str>>(context: &ContextSchema, args: &[S]) -> Help {
    let words = Lexer::new(&context.options.prefixes).command_words(args);
    match resolve(&words, context) {
        Ok(resolution) => resolved_help(context, &resolution),
        Err(_) => root_help(context),
    }
}

/// Runs lexing, resolution, help interception and binding against a
/// validated context.
///
/// Never produces `ParsingResult::Failure`; parse errors come back as
/// `Error::Parse` so the caller can report them in one place.
pub(crate) fn run<S: AsRef<str>>(
    context: &ContextSchema,
    args: &[S],
) -> Result<ParsingResult<Bound>, Error> {
    let options = &context.options;

    if args.is_empty() && options.empty_input_as_help {
        debug!("Empty input handled as help");
        return Ok(ParsingResult::Handled(root_help(context)));
    }

    let tokens = match Lexer::new(&options.prefixes).tokenize(args) {
        Ok(tokens) => tokens,
        Err(err) if args.iter().any(|arg| is_help_trigger(arg.as_ref())) => {
            debug!(subject = %err.subject, "Help requested over a lexing error");
            return Ok(ParsingResult::Handled(help_after_lex_failure(context, args)));
        }
        Err(err) => return Err(err.into()),
    };
    let help_requested = tokens.iter().any(Token::is_help);
    debug!(tokens = tokens.len(), help_requested, "Tokenized arguments");

    let resolution = match resolve(&tokens, context) {
        Ok(resolution) => resolution,
        Err(_) if help_requested => return Ok(ParsingResult::Handled(root_help(context))),
        Err(err)
            if err.kind == ParseErrorKind::InvalidCommand
                && options.unknown_command == UnknownCommandPolicy::Help =>
        {
            debug!(word = %err.subject, "Unknown command handled as help");
            return Ok(ParsingResult::Handled(root_help(context)));
        }
        Err(err) => return Err(err.into()),
    };

    let command = resolution
        .command(context)
        .ok_or_else(|| ParseError::new(ParseErrorKind::Invalid, ""))?;

    if help_requested {
        return Ok(ParsingResult::Handled(resolved_help(context, &resolution)));
    }

    let bindings = Binder::new(command, &options.prefixes)
        .with_trailing_positionals(options.trailing_positionals)
        .bind(&tokens[resolution.offset..])?;

    Ok(ParsingResult::Success(Bound {
        resolution,
        bindings,
    }))
}
