mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_binder::{SchemaParser, TracingReporter};
use command_binder_core::{CommandSchema, ContextSchema, Help, validate_context};
use tracing::Level;

use crate::output::{OutputFormat, ParseOutcome, format_outcome, help_to_text};

/// Exit code used when the arguments did not bind.
const PARSE_FAILURE_EXIT_CODE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "argbind")]
#[command(about = "Validate command schemas and bind argument vectors against them")]
#[command(version)]
struct Cli {
    /// Write debug logs to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a context schema file.
    Validate(ValidateArgs),
    /// Parse arguments against a context schema and print the outcome.
    Parse(ParseArgs),
    /// Print help text for a context schema or one of its commands.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema file (.json, .yaml or .yml).
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Raw command line, split shell-style, instead of trailing arguments.
    #[arg(long, conflicts_with = "args")]
    line: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Arguments to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Path of command names; the root context when empty.
    commands: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Command::Validate(args) => run_validate(args).map(|()| 0),
        Command::Parse(args) => run_parse(args),
        Command::Describe(args) => run_describe(args).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let context = load_schema(&args.schema)?;
    let errors = validate_context(&context);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("  {err}");
        }
        return Err(format!(
            "{} schema error(s) in {}",
            errors.len(),
            args.schema.display()
        ));
    }

    println!(
        "Validated {}: {} command(s){}.",
        args.schema.display(),
        count_commands(&context),
        if context.default_command.is_some() {
            " and a default command"
        } else {
            ""
        }
    );
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<i32, String> {
    let parser = load_parser(&args.schema)?;

    let result = match &args.line {
        Some(line) => parser.parse_line(line),
        None => parser.parse(&args.args),
    }
    .map_err(|e| e.to_string())?;

    let outcome = ParseOutcome::from(result);
    println!("{}", format_outcome(&outcome, args.format)?);

    Ok(if outcome.is_failure() {
        PARSE_FAILURE_EXIT_CODE
    } else {
        0
    })
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let parser = load_parser(&args.schema)?;

    let help = if args.commands.is_empty() {
        Help::Context(parser.help_context())
    } else {
        parser
            .command_help_context(&args.commands)
            .map(Help::Command)
            .ok_or_else(|| format!("unknown command: {}", args.commands.join(" ")))?
    };

    print!("{}", help_to_text(&help));
    Ok(())
}

fn load_parser(path: &Path) -> Result<SchemaParser, String> {
    let context = load_schema(path)?;
    SchemaParser::new(context)
        .map(|parser| parser.with_reporter(TracingReporter))
        .map_err(|e| format!("invalid schema {}: {e}", path.display()))
}

/// Reads a context schema, choosing the format from the file extension.
fn load_schema(path: &Path) -> Result<ContextSchema, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    } else {
        serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    }
}

fn count_commands(context: &ContextSchema) -> usize {
    fn count(commands: &[CommandSchema]) -> usize {
        commands.iter().map(|c| 1 + count(&c.commands)).sum()
    }
    count(&context.commands)
}

#[cfg(test)]
mod tests {
    use command_binder::ParsingResult;
    use command_binder_core::HelpContext;

    use super::*;

    #[test]
    fn test_count_commands_includes_nested() {
        let context: ContextSchema = serde_json::from_str(
            r#"{"commands": [{"name": "restore", "commands": [{"name": "restore-sub"}]}, {"name": "position"}]}"#,
        )
        .unwrap();
        assert_eq!(count_commands(&context), 3);
    }

    #[test]
    fn test_parse_outcome_from_result() {
        let outcome = ParseOutcome::from(ParsingResult::Handled(Help::Context(HelpContext {
            description: None,
            parameters: Vec::new(),
            commands: Vec::new(),
        })));
        assert!(!outcome.is_failure());
    }
}
