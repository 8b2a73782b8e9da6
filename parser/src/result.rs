//! The three-way outcome of a parse.

use command_binder_core::Help;
use serde::Serialize;

use crate::error::ParseError;

/// Discriminant of a [`ParsingResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingResultKind {
    Success,
    Handled,
    Failure,
}

/// Outcome of a parse: a bound command, a handled help request, or a parse
/// error. Schema mistakes never end up here.
#[derive(Debug)]
pub enum ParsingResult<T> {
    Success(T),
    /// Help was requested (or implied) and has been reported.
    Handled(Help),
    Failure(ParseError),
}

impl<T> ParsingResult<T> {
    pub fn kind(&self) -> ParsingResultKind {
        match self {
            Self::Success(_) => ParsingResultKind::Success,
            Self::Handled(_) => ParsingResultKind::Handled,
            Self::Failure(_) => ParsingResultKind::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn help(&self) -> Option<&Help> {
        match self {
            Self::Handled(help) => Some(help),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Maps the success value, keeping the other outcomes.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParsingResult<U> {
        match self {
            Self::Success(value) => ParsingResult::Success(f(value)),
            Self::Handled(help) => ParsingResult::Handled(help),
            Self::Failure(err) => ParsingResult::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use command_binder_core::HelpContext;

    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_kind_and_accessors() {
        let success: ParsingResult<u8> = ParsingResult::Success(7);
        assert_eq!(success.kind(), ParsingResultKind::Success);
        assert_eq!(success.success(), Some(&7));
        assert_eq!(success.map(u32::from).into_success(), Some(7u32));

        let failure: ParsingResult<u8> =
            ParsingResult::Failure(ParseError::new(ParseErrorKind::Invalid, ""));
        assert_eq!(failure.kind(), ParsingResultKind::Failure);
        assert_eq!(failure.error().unwrap().message, "Invalid arguments");
        assert!(failure.success().is_none());

        let handled: ParsingResult<u8> = ParsingResult::Handled(Help::Context(HelpContext {
            description: None,
            parameters: Vec::new(),
            commands: Vec::new(),
        }));
        assert_eq!(handled.kind(), ParsingResultKind::Handled);
        assert!(handled.help().is_some());
    }
}
