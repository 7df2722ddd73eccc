// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

const CONFIG: &str = r#"
[project]
aliases = ["major"]

[[project.manifests]]
name = "npm"
type = "json"
path = "package.json"

[[project.manifests]]
name = "chart"
type = "yaml"
path = "Chart.yaml"
loc = "version"

[project.rules]
current = ["not_empty", "regex_mmp"]
increment = ["increment"]

[[project.rules.manifest_comparisons]]
manifests = ["npm", "chart"]

[project.stages.prod]
aliases = ["minor"]
"#;

fn write_project(dir: &Path) {
    fs::write(dir.join("vertagus.toml"), CONFIG).unwrap();
    fs::write(dir.join("package.json"), r#"{"version": "2.5.1"}"#).unwrap();
    fs::write(dir.join("Chart.yaml"), "version: 2.5.1\n").unwrap();
}

fn vertagus(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_vertagus"))
        .args(args)
        .arg("--config")
        .arg(dir.join("vertagus.toml"))
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_vertagus_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_vertagus"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("vertagus"));
    assert!(stdout.contains("validate"));
    assert!(stdout.contains("create-aliases"));
}

#[test]
fn test_list_rules_text() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = vertagus(dir.path(), &["list-rules"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("  - regex_mmp"));
    assert!(stdout.contains("  - manifests_equal(npm, chart)"));
}

#[test]
fn test_list_aliases_json() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = vertagus(
        dir.path(),
        &["list-aliases", "--stage", "prod", "--alias-prefix", "v", "--json"],
    );
    assert!(output.status.success());
    let aliases: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(aliases, vec!["v2", "v2.5"]);
}

#[test]
fn test_list_aliases_legacy_none_prefix() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = vertagus(dir.path(), &["list-aliases", "--alias-prefix", "None"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "2\n");
}

#[test]
fn test_unknown_stage_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = vertagus(dir.path(), &["list-rules", "--stage", "qa"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Stage 'qa' not found"));
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = vertagus(dir.path(), &["list-rules"]);
    assert!(!output.status.success());
}
