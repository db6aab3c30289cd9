#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/../../tests/fixtures/{name}.json", env!("CARGO_MANIFEST_DIR"))
}

/// Run `cmplint` inside a fresh directory so no cmplint.toml is picked up.
fn cmplint(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cmplint").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^cmplint \d+\.\d+\.\d+ \(.+\)").unwrap());
}

#[test]
fn test_check_reports_comparisons() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            r#"app.go:4:5: error [CMP001] Result of comparison of "err" with address of new variable of type "MyErr" is always false"#,
        ))
        .stdout(predicate::str::contains(
            r#"app.go:7:5: warning [CMP002] Result of comparison of "err" with address of new zero-sized variable of type "Empty" is false or undefined"#,
        ))
        .stdout(predicate::str::contains("Found 2 issue(s): 1 error, 1 warning"))
        .stdout(predicate::str::contains("Matcher").not());
}

#[test]
fn test_check_clean_input() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", &fixture("clean")])
        .assert()
        .success()
        .stdout("No issues found\n");
}

#[test]
fn test_check_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = cmplint(&dir)
        .args(["check", "--format", "json", &fixture("errors_is")])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let diags = json["diagnostics"].as_array().unwrap();
    assert_eq!(diags.len(), 2);
    assert_eq!(json["summary"]["error"], 1);
    assert_eq!(json["summary"]["warning"], 1);
    assert_eq!(json["summary"]["packages"], 1);
    assert_eq!(diags[0]["rule"], "CMP001");
    assert_eq!(diags[0]["source"], "binary");
    assert_eq!(diags[1]["rule"], "CMP002");
    assert_eq!(diags[1]["location"]["line"], 7);
}

#[test]
fn test_check_is_flag() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", "--check-is", "false", &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#"type "Matcher""#))
        .stdout(predicate::str::contains("Found 3 issue(s)"));
}

#[test]
fn test_check_is_flag_rejects_bad_value() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--check-is", "maybe", &fixture("errors_is")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid boolean value"));
}

#[test]
fn test_severity_threshold() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", "--severity", "error", &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CMP001"))
        .stdout(predicate::str::contains("CMP002").not());
}

#[test]
fn test_max_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", "--max-diagnostics", "1", &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_config_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cmplint.toml"),
        "[cmplint]\nseverity_threshold = \"error\"\n\n[analyzer]\ncheck-is = false\n",
    )
    .unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 1 issue(s): 1 error, 0 warning"));
}

#[test]
fn test_multiple_inputs() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "--no-color", &fixture("clean"), &fixture("errors_is")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 2 issue(s)"));
}

#[test]
fn test_check_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["check", "missing.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loading missing.json"));
}

#[test]
fn test_check_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{\"packages\": {}}").unwrap();
    cmplint(&dir)
        .args(["check", "bad.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid analysis input"));
}

#[test]
fn test_explain_cmp001() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["explain", "cmp001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CMP001: Comparison with address of new variable"))
        .stdout(predicate::str::contains("errors.As"));
}

#[test]
fn test_explain_unknown_rule() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .args(["explain", "NIL001"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule: NIL001"));
}

#[test]
fn test_init_creates_config_once() {
    let dir = tempfile::tempdir().unwrap();
    cmplint(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout("Created cmplint.toml\n");
    let content = std::fs::read_to_string(dir.path().join("cmplint.toml")).unwrap();
    assert!(content.contains("check-is = true"));

    cmplint(&dir)
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}
