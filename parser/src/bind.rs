//! Binding of tokens onto a command's parameters.
//!
//! The binder owns no state across calls: which parameters have been set is
//! tracked in a local table for the duration of one [`Binder::bind`] call,
//! and the schema is only ever read.

use command_binder_core::{CommandSchema, ParameterSchema, Prefixes, SchemaError, Value, coerce};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};

/// A parameter value produced by binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// Primary name of the parameter.
    pub parameter: String,
    pub value: Value,
    /// Whether the value came from the parameter's declared default.
    pub defaulted: bool,
}

/// Binds tokens that follow command resolution onto one command.
///
/// # Examples
///
/// ```
/// use command_binder::{Binder, Lexer};
/// use command_binder_core::{CommandSchema, ParameterSchema, Prefixes, Value};
///
/// let command = CommandSchema::new("position")
///     .with_parameter(ParameterSchema::string("some"))
///     .with_parameter(ParameterSchema::string("first").at_position(1))
///     .with_parameter(ParameterSchema::string("second").at_position(2));
///
/// let prefixes = Prefixes::default();
/// let tokens = Lexer::new(&prefixes)
///     .tokenize(&["fstr", "sstr", "-some", "somestr"])
///     .unwrap();
/// let bindings = Binder::new(&command, &prefixes).bind(&tokens).unwrap();
///
/// assert_eq!(bindings[1].parameter, "first");
/// assert_eq!(bindings[1].value, Value::String("fstr".into()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    command: &'a CommandSchema,
    lexer: Lexer<'a>,
    trailing_positionals: bool,
}

impl<'a> Binder<'a> {
    pub fn new(command: &'a CommandSchema, prefixes: &'a Prefixes) -> Self {
        Self {
            command,
            lexer: Lexer::new(prefixes),
            trailing_positionals: false,
        }
    }

    /// Lets data tokens after named parameters fill unset positional slots.
    pub fn with_trailing_positionals(mut self, enabled: bool) -> Self {
        self.trailing_positionals = enabled;
        self
    }

    /// Binds `tokens`, then checks mandatory parameters and applies
    /// defaults. Bindings are returned in declaration order.
    ///
    /// Bad input is reported as [`Error::Parse`]; a default that cannot be
    /// bound is a schema mistake and is reported as [`Error::Schema`].
    pub fn bind(&self, tokens: &[Token]) -> Result<Vec<Binding>, Error> {
        let parameters = &self.command.parameters;
        let mut values: Vec<Option<Value>> = vec![None; parameters.len()];
        let positional = self.positional_indexes();
        let mut next_slot = 0;
        let mut named = false;

        if tokens.first().is_some_and(Token::is_bare) {
            debug!(command = %self.command.name, "Binding in positional mode");
        }

        for token in tokens {
            if token.is_bare() {
                if named && !self.trailing_positionals {
                    return Err(invalid_positional(token).into());
                }
                while positional
                    .get(next_slot)
                    .is_some_and(|&index| values[index].is_some())
                {
                    next_slot += 1;
                }
                let &index = positional
                    .get(next_slot)
                    .ok_or_else(|| invalid_positional(token))?;
                next_slot += 1;
                values[index] = Some(coerce_checked(&parameters[index], &token.raw, &token.raw)?);
                continue;
            }

            named = true;
            let index = parameters
                .iter()
                .position(|p| p.matches(self.lexer.identifier(token)))
                .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidParameter, &token.raw))?;
            values[index] = Some(self.named_value(&parameters[index], token)?);
        }

        if let Some(missing) = parameters
            .iter()
            .zip(&values)
            .find(|(p, v)| p.mandatory && v.is_none())
            .map(|(p, _)| p)
        {
            return Err(
                ParseError::new(ParseErrorKind::MissingParameter, missing.primary_name()).into(),
            );
        }

        let mut bindings = Vec::with_capacity(parameters.len());
        for (parameter, value) in parameters.iter().zip(values) {
            let (value, defaulted) = match value {
                Some(value) => (value, false),
                None => match &parameter.default {
                    Some(raw) => (bind_default(parameter, raw)?, true),
                    None => continue,
                },
            };
            bindings.push(Binding {
                parameter: parameter.primary_name().to_string(),
                value,
                defaulted,
            });
        }

        debug!(
            command = %self.command.name,
            bound = bindings.len(),
            "Bound parameters"
        );
        Ok(bindings)
    }

    fn named_value(
        &self,
        parameter: &ParameterSchema,
        token: &Token,
    ) -> Result<Value, ParseError> {
        let wrong_shape = || ParseError::new(ParseErrorKind::InvalidParameter, &token.raw);
        match (token.kind, parameter.kind.takes_value()) {
            (TokenKind::Switch, false) => Ok(Value::Switch(true)),
            (TokenKind::Switch, true) | (TokenKind::Option, false) => Err(wrong_shape()),
            (TokenKind::Option, true) => {
                let raw = token
                    .value
                    .as_deref()
                    .ok_or_else(|| ParseError::new(ParseErrorKind::MissingValue, &token.raw))?;
                coerce_checked(parameter, raw, &token.raw)
            }
            (TokenKind::Command | TokenKind::Data, _) => Err(wrong_shape()),
        }
    }

    fn positional_indexes(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = self
            .command
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position.is_some())
            .map(|(i, _)| i)
            .collect();
        indexes.sort_by_key(|&i| self.command.parameters[i].position);
        indexes
    }
}

fn invalid_positional(token: &Token) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidPositionalParameters, &token.raw)
}

/// Coerces `raw` and runs the parameter's constraints; `subject` names the
/// offending token in errors.
fn coerce_checked(
    parameter: &ParameterSchema,
    raw: &str,
    subject: &str,
) -> Result<Value, ParseError> {
    let value = coerce(&parameter.kind, raw)
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidValue, subject))?;
    if let Some(failed) = parameter.constraints.iter().find(|c| !c.check(&value)) {
        return Err(ParseError::with_message(
            ParseErrorKind::Constraint,
            subject,
            failed.message_for(parameter.primary_name()),
        ));
    }
    Ok(value)
}

fn bind_default(parameter: &ParameterSchema, raw: &str) -> Result<Value, SchemaError> {
    let name = parameter.primary_name().to_string();
    let value = coerce(&parameter.kind, raw).map_err(|err| SchemaError::InvalidDefault {
        parameter: name.clone(),
        reason: err.to_string(),
    })?;
    match parameter.constraints.iter().find(|c| !c.check(&value)) {
        Some(failed) => Err(SchemaError::DefaultViolatesConstraint {
            message: failed.message_for(&name),
            parameter: name,
        }),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use command_binder_core::{Constraint, ParameterKind};

    use super::*;

    fn default_command() -> CommandSchema {
        CommandSchema::default()
            .with_parameter(ParameterSchema::string("my"))
            .with_parameter(ParameterSchema::string("s1,s2"))
            .with_parameter(ParameterSchema::string("set-something,s-s"))
            .with_parameter(ParameterSchema::string_array("sa"))
            .with_parameter(ParameterSchema::int("int").mandatory())
            .with_parameter(ParameterSchema::switch("sw"))
            .with_parameter(ParameterSchema::new(
                ["p"],
                ParameterKind::enumeration(["None", "Windows", "Unix", "Linux"]),
            ))
    }

    fn position_command() -> CommandSchema {
        CommandSchema::new("position")
            .with_parameter(ParameterSchema::string("some"))
            .with_parameter(ParameterSchema::string("first").at_position(1))
            .with_parameter(ParameterSchema::string("second").at_position(2))
    }

    fn bind(command: &CommandSchema, args: &[&str]) -> Result<Vec<Binding>, Error> {
        bind_with(command, args, false)
    }

    fn bind_with(
        command: &CommandSchema,
        args: &[&str],
        trailing: bool,
    ) -> Result<Vec<Binding>, Error> {
        let prefixes = Prefixes::default();
        let tokens = Lexer::new(&prefixes).tokenize(args).unwrap();
        Binder::new(command, &prefixes)
            .with_trailing_positionals(trailing)
            .bind(&tokens)
    }

    fn value_of<'b>(bindings: &'b [Binding], name: &str) -> Option<&'b Value> {
        bindings
            .iter()
            .find(|b| b.parameter == name)
            .map(|b| &b.value)
    }

    fn parse_kind(result: Result<Vec<Binding>, Error>) -> ParseErrorKind {
        match result {
            Err(Error::Parse(err)) => err.kind,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_named_binding_by_primary_and_alias() {
        let bindings = bind(
            &default_command(),
            &["-my", "some", "-s2", "something", "-int", "3", "--sw", "-set-something", "hello"],
        )
        .unwrap();

        assert_eq!(value_of(&bindings, "my"), Some(&Value::String("some".into())));
        assert_eq!(value_of(&bindings, "s1"), Some(&Value::String("something".into())));
        assert_eq!(value_of(&bindings, "int"), Some(&Value::Int(3)));
        assert_eq!(value_of(&bindings, "sw"), Some(&Value::Switch(true)));
        assert_eq!(
            value_of(&bindings, "set-something"),
            Some(&Value::String("hello".into()))
        );
        assert!(value_of(&bindings, "sa").is_none());
    }

    #[test]
    fn test_unknown_named_token_is_invalid_parameter() {
        let err = bind(&default_command(), &["-int", "3", "-nope", "x"]).unwrap_err();
        match err {
            Error::Parse(err) => {
                assert_eq!(err.kind, ParseErrorKind::InvalidParameter);
                assert_eq!(err.subject, "-nope");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_switch_and_option_shapes_must_match() {
        assert_eq!(
            parse_kind(bind(&default_command(), &["-int", "3", "--my"])),
            ParseErrorKind::InvalidParameter
        );
        assert_eq!(
            parse_kind(bind(&default_command(), &["-int", "3", "-sw", "true"])),
            ParseErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_missing_mandatory_names_primary() {
        let err = bind(&default_command(), &["--sw"]).unwrap_err();
        match err {
            Error::Parse(err) => {
                assert_eq!(err.kind, ParseErrorKind::MissingParameter);
                assert_eq!(err.subject, "int");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_kind(bind(&default_command(), &["-int", "some"])),
            ParseErrorKind::InvalidValue
        );
        assert_eq!(
            parse_kind(bind(&default_command(), &["-int", "3", "-p", "windows,unix"])),
            ParseErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_repeated_parameter_last_wins() {
        let bindings = bind(&default_command(), &["-int", "3", "-int", "4"]).unwrap();
        assert_eq!(value_of(&bindings, "int"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_positional_then_named() {
        let bindings = bind(&position_command(), &["fstr", "sstr", "-some", "somestr"]).unwrap();
        assert_eq!(value_of(&bindings, "first"), Some(&Value::String("fstr".into())));
        assert_eq!(value_of(&bindings, "second"), Some(&Value::String("sstr".into())));
        assert_eq!(value_of(&bindings, "some"), Some(&Value::String("somestr".into())));
    }

    #[test]
    fn test_too_many_positionals() {
        assert_eq!(
            parse_kind(bind(&position_command(), &["a", "b", "c"])),
            ParseErrorKind::InvalidPositionalParameters
        );
    }

    #[test]
    fn test_data_after_named_needs_trailing_option() {
        let args = ["-some", "somestr", "fstr", "sstr"];
        assert_eq!(
            parse_kind(bind(&position_command(), &args)),
            ParseErrorKind::InvalidPositionalParameters
        );

        let bindings = bind_with(&position_command(), &args, true).unwrap();
        assert_eq!(value_of(&bindings, "first"), Some(&Value::String("fstr".into())));
        assert_eq!(value_of(&bindings, "second"), Some(&Value::String("sstr".into())));
    }

    #[test]
    fn test_trailing_positionals_skip_slots_set_by_name() {
        let bindings = bind_with(&position_command(), &["-first", "a", "b"], true).unwrap();
        assert_eq!(value_of(&bindings, "first"), Some(&Value::String("a".into())));
        assert_eq!(value_of(&bindings, "second"), Some(&Value::String("b".into())));
    }

    #[test]
    fn test_constraint_failure_uses_rendered_message() {
        let command = CommandSchema::new("constraints").with_parameter(
            ParameterSchema::int("some").with_constraint(Constraint::range(3, 100)),
        );

        let err = bind(&command, &["-some", "100"]).unwrap_err();
        match err {
            Error::Parse(err) => {
                assert_eq!(err.kind, ParseErrorKind::Constraint);
                assert_eq!(err.message, "Not in correct range: some");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(bind(&command, &["-some", "99"]).is_ok());
    }

    #[test]
    fn test_defaults_are_applied_to_unset_parameters() {
        let command = CommandSchema::new("build")
            .with_parameter(ParameterSchema::int("jobs").with_default("4"))
            .with_parameter(ParameterSchema::string("target"));

        let bindings = bind(&command, &[]).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].value, Value::Int(4));
        assert!(bindings[0].defaulted);

        let bindings = bind(&command, &["-jobs", "8"]).unwrap();
        assert_eq!(bindings[0].value, Value::Int(8));
        assert!(!bindings[0].defaulted);
    }

    #[test]
    fn test_unbindable_default_is_schema_error() {
        let command = CommandSchema::new("build")
            .with_parameter(ParameterSchema::int("jobs").with_default("many"));

        let err = bind(&command, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::InvalidDefault { ref parameter, .. }) if parameter == "jobs"
        ));
    }
}
