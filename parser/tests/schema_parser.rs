use command_binder::{ParseErrorKind, ParsingResultKind, SchemaParser, split_command_line};
use command_binder_core::{ContextSchema, Help, SchemaError, Value};

const BACKUP_SCHEMA: &str = r#"{
    "description": "backup tool v1.0",
    "default_command": {
        "name": "",
        "parameters": [
            { "names": ["file"], "position": 1 },
            { "names": ["verbose", "v"], "kind": { "type": "switch" } }
        ]
    },
    "commands": [
        {
            "name": "restore",
            "description": "restores a snapshot",
            "parameters": [
                { "names": ["snapshot", "s"], "mandatory": true },
                { "names": ["jobs", "j"], "kind": { "type": "int" }, "default": "4",
                  "constraints": [ { "rule": "range", "min": 1, "max": 64, "max_inclusive": true } ] },
                { "names": ["only"], "kind": { "type": "string_array" } },
                { "names": ["platform"], "kind": { "type": "flags", "members": [
                    { "name": "Windows", "value": 1 },
                    { "name": "Unix", "value": 2 },
                    { "name": "Linux", "value": 4 }
                ] } }
            ],
            "commands": [
                { "name": "verify", "parameters": [ { "names": ["deep"], "kind": { "type": "switch" } } ] }
            ]
        }
    ],
    "options": { "trailing_positionals": false }
}"#;

fn parser() -> SchemaParser {
    let context: ContextSchema = serde_json::from_str(BACKUP_SCHEMA).unwrap();
    SchemaParser::new(context).unwrap()
}

#[test]
fn test_schema_from_json_binds_values_with_defaults() {
    let bound = parser()
        .parse_line("restore -s nightly -only etc,home -platform unix,linux")
        .unwrap()
        .into_success()
        .unwrap();

    assert_eq!(bound.path, vec!["restore"]);
    assert_eq!(bound.get_str("snapshot"), Some("nightly"));
    assert_eq!(bound.get_int("jobs"), Some(4));
    assert_eq!(
        bound.get_strings("only"),
        Some(&["etc".to_string(), "home".to_string()][..])
    );
    assert_eq!(bound.get("platform").and_then(Value::as_bits), Some(6));
}

#[test]
fn test_unknown_word_binds_to_default_positional() {
    let bound = parser()
        .parse(&["notes.txt", "--v"])
        .unwrap()
        .into_success()
        .unwrap();

    assert!(bound.is_default);
    assert_eq!(bound.get_str("file"), Some("notes.txt"));
    assert!(bound.switch("verbose"));
}

#[test]
fn test_nested_command_path() {
    let bound = parser()
        .parse(&["RESTORE", "verify", "--deep"])
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(bound.path, vec!["restore", "verify"]);
    assert!(bound.switch("deep"));
    assert!(bound.values.get("snapshot").is_none());
}

#[test]
fn test_constraint_on_user_value() {
    let result = parser().parse_line("restore -s x -j 65").unwrap();
    let err = result.error().unwrap();
    assert_eq!(err.kind, ParseErrorKind::Constraint);
    assert_eq!(err.subject, "-j");
    assert_eq!(err.message, "Not in correct range: jobs");
}

#[test]
fn test_help_outcome_serializes_with_scope() {
    let result = parser().parse_line("restore verify -h").unwrap();
    assert_eq!(result.kind(), ParsingResultKind::Handled);

    let json = serde_json::to_value(result.help().unwrap()).unwrap();
    assert_eq!(json["scope"], "command");
    assert_eq!(json["name"], "verify");
    assert_eq!(json["parameters"][0]["full_name"], "--deep");
}

#[test]
fn test_default_violating_constraint_is_rejected_up_front() {
    let mut context: ContextSchema = serde_json::from_str(BACKUP_SCHEMA).unwrap();
    context.commands[0].parameters[1].default = Some("100".to_string());

    let err = SchemaParser::new(context).err().unwrap();
    assert!(matches!(
        err,
        SchemaError::DefaultViolatesConstraint { ref parameter, .. } if parameter == "jobs"
    ));
}

#[test]
fn test_bound_command_serializes_values_untagged() {
    let bound = parser()
        .parse(&split_command_line(r#"restore -s "weekly full""#))
        .unwrap()
        .into_success()
        .unwrap();

    let json = serde_json::to_value(&bound).unwrap();
    assert_eq!(json["path"][0], "restore");
    assert_eq!(json["values"]["snapshot"], "weekly full");
    assert_eq!(json["values"]["jobs"], 4);
}

#[test]
fn test_root_help_lists_default_parameters() {
    let help = parser().help_context();
    assert_eq!(help.description.as_deref(), Some("backup tool v1.0"));
    assert_eq!(help.parameters[1].full_name, "--verbose,--v");
    assert_eq!(help.commands[0].description.as_deref(), Some("restores a snapshot"));

    let result = parser().parse(&["--help"]).unwrap();
    assert!(matches!(result.help(), Some(Help::Context(_))));
}
