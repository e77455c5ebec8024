use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn compguard_cmd() -> Command {
    Command::cargo_bin("compguard").expect("compguard binary not found - run `cargo build` first")
}

fn inventory(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
        .join("inventory.json")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("parse json")
}

#[test]
fn help_lists_commands() {
    compguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("explain"))
        .stdout(predicate::str::contains("md"));
}

#[test]
fn explain_accepts_loose_subject_names() {
    for name in ["CPE", "cpe", "package_url", "license-group"] {
        compguard_cmd()
            .args(["explain", name])
            .assert()
            .success()
            .stdout(predicate::str::contains("Operators"))
            .stdout(predicate::str::contains("Example"));
    }
}

#[test]
fn explain_unknown_subject_exits_1() {
    compguard_cmd()
        .args(["explain", "flavor"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown condition subject: flavor"))
        .stderr(predicate::str::contains("VULNERABILITY_ID"));
}

#[test]
fn evaluate_writes_markdown_and_state() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("out/report.json");
    let markdown = tmp.path().join("out/comment.md");
    let state = tmp.path().join("state/violations.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .arg("evaluate")
        .arg("--inventory")
        .arg(inventory("log4j"))
        .arg("--state")
        .arg(&state)
        .arg("--report-out")
        .arg(&report)
        .arg("--write-markdown")
        .arg("--markdown-out")
        .arg(&markdown)
        .assert()
        .code(2);

    let md = std::fs::read_to_string(&markdown).expect("read markdown");
    assert!(md.contains("Verdict: **FAIL**"));
    assert!(md.contains("`no-critical-vulns`"));

    let saved = read_json(&state);
    assert_eq!(saved["schema"], "compguard.state.v1");
    assert_eq!(saved["violations"].as_array().map(Vec::len), Some(4));

    // A second run against the saved state finds nothing new.
    compguard_cmd()
        .current_dir(tmp.path())
        .arg("evaluate")
        .arg("--inventory")
        .arg(inventory("log4j"))
        .arg("--state")
        .arg(&state)
        .arg("--report-out")
        .arg(&report)
        .assert()
        .code(2);
    let second = read_json(&report);
    assert_eq!(second["data"]["violations_added"], 0);
    assert_eq!(second["data"]["violations_total"], 4);
}

#[test]
fn evaluate_selected_component_with_strict_profile() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("report.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .args(["--profile", "strict", "evaluate"])
        .arg("--inventory")
        .arg(inventory("log4j"))
        .args(["--component", "comp-readline"])
        .arg("--report-out")
        .arg(&report)
        .assert()
        .code(2);

    let value = read_json(&report);
    assert_eq!(value["verdict"], "fail");
    assert_eq!(value["data"]["components_evaluated"], 1);
    assert_eq!(value["violations"][0]["state"], "WARN");
}

#[test]
fn warn_only_run_passes_with_default_profile() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("report.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .arg("evaluate")
        .arg("--inventory")
        .arg(inventory("log4j"))
        .args(["--component", "comp-readline"])
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success();

    assert_eq!(read_json(&report)["verdict"], "warn");
}

#[test]
fn config_file_is_read() {
    let tmp = TempDir::new().expect("temp dir");
    let config = tmp.path().join("compguard.toml");
    std::fs::write(&config, "fail_on = \"warn\"\n").expect("write config");
    let report = tmp.path().join("report.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("evaluate")
        .arg("--inventory")
        .arg(inventory("log4j"))
        .args(["--component", "comp-readline"])
        .arg("--report-out")
        .arg(&report)
        .assert()
        .code(2);
}

#[test]
fn zero_worker_threads_is_a_runtime_error() {
    let tmp = TempDir::new().expect("temp dir");

    compguard_cmd()
        .current_dir(tmp.path())
        .args(["--worker-threads", "0", "evaluate"])
        .arg("--inventory")
        .arg(inventory("passing"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("worker_threads"));
}

#[test]
fn largest_timeout_still_evaluates() {
    let tmp = TempDir::new().expect("temp dir");

    compguard_cmd()
        .current_dir(tmp.path())
        .args(["--timeout-secs", &u64::MAX.to_string(), "evaluate"])
        .arg("--inventory")
        .arg(inventory("passing"))
        .assert()
        .success();
}

#[test]
fn missing_inventory_is_a_runtime_error() {
    let tmp = TempDir::new().expect("temp dir");

    compguard_cmd()
        .current_dir(tmp.path())
        .args(["evaluate", "--inventory", "nope.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("compguard error"))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn md_renders_saved_report() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("report.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .arg("evaluate")
        .arg("--inventory")
        .arg(inventory("passing"))
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success();

    compguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Compguard report"))
        .stdout(predicate::str::contains("No policy violations"));
}

#[test]
fn stdout_stays_clean_with_verbose_logging() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("report.json");

    compguard_cmd()
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .args(["--log-level", "debug", "evaluate"])
        .arg("--inventory")
        .arg(inventory("passing"))
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("evaluating against applicable policies"));
}
