//! End-to-end CLI tests against the fixtures in `tests/fixtures/`.
//!
//! Each fixture directory holds an `inventory.json` and an `expected.report.json` whose
//! timestamps and tool version are already normalized.

use assert_cmd::Command;
use compguard_test_util::normalize_nondeterministic;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn compguard_cmd() -> Command {
    Command::cargo_bin("compguard").expect("compguard binary not found - run `cargo build` first")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}

/// Run `evaluate` on a fixture and return the exit code and JSON report.
fn run_evaluate_on_fixture(fixture_name: &str) -> (i32, Value) {
    let temp_dir = TempDir::new().expect("temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = compguard_cmd()
        .current_dir(temp_dir.path())
        .arg("evaluate")
        .arg("--inventory")
        .arg(fixtures_dir().join(fixture_name).join("inventory.json"))
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("run compguard");

    let exit_code = output.status.code().unwrap_or(-1);
    let text = std::fs::read_to_string(&report_path).expect("read report");
    (exit_code, serde_json::from_str(&text).expect("parse report"))
}

fn load_expected_report(fixture_name: &str) -> Value {
    let path = fixtures_dir().join(fixture_name).join("expected.report.json");
    let text = std::fs::read_to_string(path).expect("read expected report");
    serde_json::from_str(&text).expect("parse expected report")
}

fn assert_reports_match(actual: Value, expected: Value, fixture_name: &str) {
    let actual = normalize_nondeterministic(actual);
    let expected = normalize_nondeterministic(expected);
    assert_eq!(
        actual,
        expected,
        "Report mismatch for fixture '{}'.\n\nActual:\n{}",
        fixture_name,
        serde_json::to_string_pretty(&actual).unwrap_or_default()
    );
}

#[test]
fn fixture_passing_passes() {
    let (exit_code, report) = run_evaluate_on_fixture("passing");
    assert_eq!(exit_code, 0, "passing fixture should exit with 0");
    assert_reports_match(report, load_expected_report("passing"), "passing");
}

#[test]
fn fixture_log4j_fails() {
    let (exit_code, report) = run_evaluate_on_fixture("log4j");
    assert_eq!(exit_code, 2, "log4j fixture should exit with 2 (fail)");
    assert_reports_match(report, load_expected_report("log4j"), "log4j");
}
