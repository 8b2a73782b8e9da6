//! Classification of raw arguments into tokens.
//!
//! The lexer knows nothing about commands or parameters. It only looks at
//! prefixes and position: bare words before the first named token are
//! command words, bare words after it are data, and an option always
//! consumes the argument that follows it.

use command_binder_core::Prefixes;
use serde::Serialize;

use crate::error::{ParseError, ParseErrorKind};

/// Literals that request help, compared case-insensitively.
pub const HELP_TRIGGERS: [&str; 3] = ["-h", "--h", "--help"];

/// Returns `true` when `arg` is one of the [`HELP_TRIGGERS`].
pub fn is_help_trigger(arg: &str) -> bool {
    HELP_TRIGGERS.iter().any(|t| t.eq_ignore_ascii_case(arg))
}

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bare word before any option or switch.
    Command,
    /// Prefixed with the option prefix; carries a value.
    Option,
    /// Prefixed with the switch prefix; carries no value.
    Switch,
    /// Bare word after the first option or switch.
    Data,
}

/// A classified argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The argument as given, prefix included.
    pub raw: String,
    /// The consumed value of an option token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Token {
    pub fn command(raw: &str) -> Self {
        Self::bare(TokenKind::Command, raw)
    }

    pub fn data(raw: &str) -> Self {
        Self::bare(TokenKind::Data, raw)
    }

    pub fn switch(raw: &str) -> Self {
        Self::bare(TokenKind::Switch, raw)
    }

    pub fn option(raw: &str, value: &str) -> Self {
        Self {
            kind: TokenKind::Option,
            raw: raw.to_string(),
            value: Some(value.to_string()),
        }
    }

    fn bare(kind: TokenKind, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            value: None,
        }
    }

    /// Whether the token is an unprefixed word.
    pub fn is_bare(&self) -> bool {
        matches!(self.kind, TokenKind::Command | TokenKind::Data)
    }

    /// Whether the token is a switch spelled as a help literal.
    pub fn is_help(&self) -> bool {
        self.kind == TokenKind::Switch && is_help_trigger(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Option,
    Switch,
    Bare,
}

/// Turns raw arguments into [`Token`]s using a pair of [`Prefixes`].
///
/// # Examples
///
/// ```
/// use command_binder::{Lexer, TokenKind};
/// use command_binder_core::Prefixes;
///
/// let prefixes = Prefixes::default();
/// let lexer = Lexer::new(&prefixes);
/// let tokens = lexer.tokenize(&["restore", "-p", "linux", "--an", "extra"]).unwrap();
///
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Command, TokenKind::Option, TokenKind::Switch, TokenKind::Data]
/// );
/// assert_eq!(tokens[1].value.as_deref(), Some("linux"));
/// assert_eq!(lexer.identifier(&tokens[2]), "an");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    prefixes: &'a Prefixes,
}

impl<'a> Lexer<'a> {
    pub fn new(prefixes: &'a Prefixes) -> Self {
        Self { prefixes }
    }

    /// Tokenizes `args`, failing fast with `MissingValue` when an option has
    /// no value to consume.
    pub fn tokenize<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::with_capacity(args.len());
        let mut seen_named = false;
        let mut args = args.iter().map(AsRef::as_ref).peekable();

        while let Some(arg) = args.next() {
            if is_help_trigger(arg) {
                seen_named = true;
                tokens.push(Token::switch(arg));
                continue;
            }

            match self.shape(arg) {
                Shape::Switch => {
                    seen_named = true;
                    tokens.push(Token::switch(arg));
                }
                Shape::Option => {
                    seen_named = true;
                    let value = args
                        .next_if(|next| self.shape(next) == Shape::Bare && !is_help_trigger(next))
                        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingValue, arg))?;
                    tokens.push(Token::option(arg, value));
                }
                Shape::Bare if seen_named => tokens.push(Token::data(arg)),
                Shape::Bare => tokens.push(Token::command(arg)),
            }
        }

        Ok(tokens)
    }

    /// The leading bare words of `args` as command tokens. Never fails, so
    /// it can still locate the command when [`Lexer::tokenize`] does not.
    pub fn command_words<S: AsRef<str>>(&self, args: &[S]) -> Vec<Token> {
        args.iter()
            .map(AsRef::as_ref)
            .take_while(|arg| !is_help_trigger(arg) && self.shape(arg) == Shape::Bare)
            .map(Token::command)
            .collect()
    }

    /// The token's text with its option or switch prefix stripped.
    pub fn identifier<'t>(&self, token: &'t Token) -> &'t str {
        let prefix = match token.kind {
            TokenKind::Option => &self.prefixes.option,
            TokenKind::Switch => &self.prefixes.switch,
            TokenKind::Command | TokenKind::Data => return &token.raw,
        };
        token.raw.strip_prefix(prefix.as_str()).unwrap_or(&token.raw)
    }

    fn shape(&self, arg: &str) -> Shape {
        let Prefixes { option, switch } = self.prefixes;
        // A longer prefix may contain the shorter one, so it is tested first.
        let ordered = if switch.len() >= option.len() {
            [(switch, Shape::Switch), (option, Shape::Option)]
        } else {
            [(option, Shape::Option), (switch, Shape::Switch)]
        };
        ordered
            .into_iter()
            .find(|(prefix, _)| arg.starts_with(prefix.as_str()))
            .map(|(_, shape)| shape)
            .unwrap_or(Shape::Bare)
    }
}
