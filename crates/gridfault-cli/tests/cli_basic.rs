//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points HOME at a private temp directory so it gets its own report store.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "-p", "gridfault-cli", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn submit_report(home: &Path) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(
        home,
        &[
            "report",
            "submit",
            "--reporter",
            "Ada",
            "--phone",
            "555-0100",
            "--email",
            "ada@example.com",
            "--location",
            "Main St & 4th",
            "--fault-type",
            "power-outage",
            "--description",
            "Whole block dark",
        ],
    );
    assert_eq!(code, 0, "report submit failed: {stderr}");
    serde_json::from_str(&stdout).expect("submit output is not JSON")
}

#[test]
fn test_report_submit_and_list() {
    let home = tempfile::tempdir().unwrap();

    let report = submit_report(home.path());
    assert_eq!(report["status"], "pending");
    assert_eq!(report["severity"], "high"); // Derived from power-outage.
    assert!(report["id"].as_str().is_some());

    let (stdout, _, code) = run_cli(home.path(), &["report", "list"]);
    assert_eq!(code, 0, "report list failed");
    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["location"], "Main St & 4th");

    let (stdout, _, code) = run_cli(home.path(), &["report", "list", "--status", "resolved"]);
    assert_eq!(code, 0, "filtered report list failed");
    let resolved: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(resolved.as_array().unwrap().is_empty());
}

#[test]
fn test_delegate_and_resolve_flow() {
    let home = tempfile::tempdir().unwrap();

    let report = submit_report(home.path());
    let id = report["id"].as_str().unwrap();

    let (_, stderr, code) = run_cli(
        home.path(),
        &[
            "team",
            "add",
            "--name",
            "Line Crew A",
            "--specialty",
            "cable-damage",
            "--email",
            "linecrew-a@example.com",
        ],
    );
    assert_eq!(code, 0, "team add failed: {stderr}");

    let (stdout, stderr, code) = run_cli(home.path(), &["delegate", id, "Line Crew A"]);
    assert_eq!(code, 0, "delegate failed: {stderr}");
    let delegated: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(delegated["status"], "delegated");
    assert_eq!(delegated["delegated_to"], "Line Crew A");

    let (stdout, stderr, code) = run_cli(home.path(), &["resolve", id]);
    assert_eq!(code, 0, "resolve failed: {stderr}");
    let resolved: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(resolved["status"], "resolved");

    // Resolving twice violates the forward-only lifecycle.
    let (_, stderr, code) = run_cli(home.path(), &["resolve", id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_delegate_to_unknown_team_fails() {
    let home = tempfile::tempdir().unwrap();

    let report = submit_report(home.path());
    let id = report["id"].as_str().unwrap();

    let (_, stderr, code) = run_cli(home.path(), &["delegate", id, "Ghost Crew"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown team"));
}

#[test]
fn test_invalid_fault_type_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(
        home.path(),
        &[
            "report",
            "submit",
            "--reporter",
            "Ada",
            "--phone",
            "555-0100",
            "--email",
            "ada@example.com",
            "--location",
            "Main St & 4th",
            "--fault-type",
            "lightning",
            "--description",
            "?",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_show_prints_defaults() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[reminder]"));
    assert!(stdout.contains("poll_interval_secs"));
    assert!(stdout.contains("[notifier]"));
}
