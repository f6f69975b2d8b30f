#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "LAZYENV_TEST_PORT": { "type": "integer", "minimum": 1 },
        "LAZYENV_TEST_NAME": { "type": "string" }
    },
    "required": ["LAZYENV_TEST_PORT"]
}"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "lazyenv-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("env.schema.json");
    std::fs::write(&path, SCHEMA).expect("schema file should be writable");
    path
}

fn lazyenv(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lazyenv"));
    command
        .args(args)
        .env_remove("LAZYENV_TEST_PORT")
        .env_remove("LAZYENV_TEST_NAME")
        .env_remove("LAZYENV_SCHEMA");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("lazyenv should run")
}

#[test]
fn check_passes_for_valid_environment() {
    let dir = unique_temp_dir("check-valid");
    let schema = write_schema(&dir);

    let output = lazyenv(
        &["--format", "json", "check", "--schema", schema.to_str().unwrap()],
        &[("LAZYENV_TEST_PORT", "8080"), ("LAZYENV_TEST_NAME", "s3cr3t")],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["valid"], serde_json::json!(true));
    assert!(!stdout.contains("s3cr3t"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_fails_with_data_invalid_exit_code() {
    let dir = unique_temp_dir("check-invalid");
    let schema = write_schema(&dir);

    let output = lazyenv(
        &["--format", "json", "check", "--schema", schema.to_str().unwrap()],
        &[("LAZYENV_TEST_PORT", "zero")],
    );

    assert_eq!(output.status.code(), Some(60));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should be json");
    assert_eq!(report["valid"], serde_json::json!(false));
    assert!(!report["issues"].as_array().unwrap().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn strict_check_ignores_undeclared_variables() {
    let dir = unique_temp_dir("check-strict");
    let schema = write_schema(&dir);

    let output = lazyenv(
        &["--format", "json", "check", "--strict", "--schema", schema.to_str().unwrap()],
        &[("LAZYENV_TEST_PORT", "8080"), ("LAZYENV_TEST_EXTRA", "1")],
    );

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], serde_json::json!(true));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn get_prints_coerced_value() {
    let dir = unique_temp_dir("get");
    let schema = write_schema(&dir);

    let output = lazyenv(
        &["--format", "json", "get", "--schema", schema.to_str().unwrap(), "LAZYENV_TEST_PORT"],
        &[("LAZYENV_TEST_PORT", "8080")],
    );

    assert_eq!(output.status.code(), Some(0));
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["value"], serde_json::json!(8080));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn schema_path_can_come_from_env() {
    let dir = unique_temp_dir("schema-env");
    let schema = write_schema(&dir);

    let output = lazyenv(
        &["--format", "raw", "get", "LAZYENV_TEST_PORT"],
        &[
            ("LAZYENV_SCHEMA", schema.to_str().unwrap()),
            ("LAZYENV_TEST_PORT", "9"),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "9");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_schema_file_is_usage_error() {
    let dir = unique_temp_dir("missing-schema");
    let missing = dir.join("nope.json");

    let output = lazyenv(&["check", "--schema", missing.to_str().unwrap()], &[]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load schema"));

    let _ = std::fs::remove_dir_all(&dir);
}
