use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Context schema mirroring a small backup tool.
const SCHEMA_JSON: &str = r#"{
    "description": "some program v1.0",
    "default_command": {
        "name": "",
        "parameters": [
            { "names": ["my"], "description": "my string" },
            { "names": ["int"], "kind": { "type": "int" }, "mandatory": true },
            { "names": ["sw"], "kind": { "type": "switch" } }
        ]
    },
    "commands": [
        {
            "name": "restore",
            "description": "restores something from there",
            "parameters": [
                { "names": ["an"], "kind": { "type": "switch" }, "description": "specify another" },
                { "names": ["p"], "kind": { "type": "enum", "members": [
                    { "name": "None", "value": 0 },
                    { "name": "Windows", "value": 1 },
                    { "name": "Linux", "value": 2 }
                ] } }
            ],
            "commands": [
                { "name": "restore-sub", "parameters": [ { "names": ["some"], "kind": { "type": "switch" } } ] }
            ]
        }
    ]
}"#;

const SCHEMA_YAML: &str = r#"description: yaml program
commands:
  - name: position
    parameters:
      - names: [some]
      - names: [first]
        position: 1
      - names: [second]
        position: 2
"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write schema");
    path
}

fn argbind(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argbind"))
        .args(args)
        .output()
        .expect("failed to run argbind")
}

fn parse_json(schema: &Path, args: &[&str]) -> (Option<i32>, serde_json::Value) {
    let mut full = vec!["parse", "--schema", schema.to_str().unwrap(), "--"];
    full.extend_from_slice(args);
    let out = argbind(&full);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON output ({e}): {stdout}"));
    (out.status.code(), value)
}

#[test]
fn validate_accepts_valid_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.json", SCHEMA_JSON);

    let out = argbind(&["validate", schema.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("2 command(s) and a default command"), "{stdout}");
}

#[test]
fn validate_reports_schema_errors() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(
        &dir,
        "bad.json",
        r#"{"default_command": {"name": "", "parameters": [{"names": ["my not"]}]}}"#,
    );

    let out = argbind(&["validate", schema.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("\"my not\""), "{stderr}");
    assert!(stderr.contains("1 schema error(s)"), "{stderr}");
}

#[test]
fn validate_reports_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    let out = argbind(&["validate", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));
}

#[test]
fn parse_prints_success_outcome() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.json", SCHEMA_JSON);

    let (code, value) = parse_json(&schema, &["restore", "--an", "-p", "linux"]);
    assert_eq!(code, Some(0));
    assert_eq!(value["outcome"], "success");
    assert_eq!(value["command"][0], "restore");
    assert_eq!(value["values"]["an"], true);
    assert_eq!(value["values"]["p"]["member"], "Linux");
}

#[test]
fn parse_failure_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.json", SCHEMA_JSON);

    let (code, value) = parse_json(&schema, &["-int", "some"]);
    assert_eq!(code, Some(2));
    assert_eq!(value["outcome"], "failure");
    assert_eq!(value["error"]["kind"], "InvalidValue");
    assert_eq!(value["error"]["message"], "Invalid value: -int");
}

#[test]
fn parse_help_is_handled() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.json", SCHEMA_JSON);

    let (code, value) = parse_json(&schema, &["restore", "restore-sub", "--help"]);
    assert_eq!(code, Some(0));
    assert_eq!(value["outcome"], "handled");
    assert_eq!(value["help"]["scope"], "command");
    assert_eq!(value["help"]["name"], "restore-sub");
}

#[test]
fn parse_line_from_yaml_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.yaml", SCHEMA_YAML);

    let out = argbind(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "yaml",
        "--line",
        r#"position "first value" sstr -some somestr"#,
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("outcome: success"), "{stdout}");
    assert!(stdout.contains("first: first value"), "{stdout}");
    assert!(stdout.contains("second: sstr"), "{stdout}");
}

#[test]
fn parse_rejects_invalid_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "empty.json", "{}");

    let out = argbind(&["parse", "--schema", schema.to_str().unwrap(), "--", "x"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid schema"));
}

#[test]
fn describe_renders_root_and_command_help() {
    let dir = TempDir::new().unwrap();
    let schema = write_file(&dir, "schema.json", SCHEMA_JSON);
    let schema = schema.to_str().unwrap();

    let out = argbind(&["describe", "--schema", schema]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("  some program v1.0\n"), "{stdout}");
    assert!(stdout.contains("restore  restores something from there"), "{stdout}");
    assert!(stdout.contains("-int"), "{stdout}");

    let out = argbind(&["describe", "--schema", schema, "restore"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Command: restore\n"), "{stdout}");
    assert!(stdout.contains("--an  specify another (switch)"), "{stdout}");
    assert!(stdout.contains("one of: None|Windows|Linux"), "{stdout}");

    let out = argbind(&["describe", "--schema", schema, "nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown command: nope"));
}
