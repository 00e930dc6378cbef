//! Integration tests for the ophub CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd. Every
//! test gets its own data directory, so the demo data is seeded fresh.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SNAPSHOT_FILE: &str = "operations-hub-data.json";

/// Helper to get an ophub command bound to a data directory.
///
/// The config dir is pointed into the temp dir too, so a developer's own
/// config file cannot leak into the tests.
fn ophub(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ophub").unwrap();
    cmd.env_remove("OPHUB_DATA_DIR")
        .env_remove("OPHUB_STORAGE_KEY")
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .arg("--data-dir")
        .arg(tmp.path().join("data"));
    cmd
}

fn snapshot_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("data").join(SNAPSHOT_FILE)
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn ticket_count(tmp: &TempDir) -> String {
    stdout_of(ophub(tmp).args(["ticket", "list", "--count"]))
        .trim()
        .to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("versioned JSON snapshot"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ophub"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ophub"));
}

// ============================================================================
// Snapshot Lifecycle Tests
// ============================================================================

#[test]
fn test_first_run_seeds_and_persists() {
    let tmp = TempDir::new().unwrap();
    assert!(!snapshot_path(&tmp).exists());

    ophub(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Open tickets"));

    let saved = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    assert!(saved.contains("\"version\":1"));
    assert_eq!(ticket_count(&tmp), "3");
}

#[test]
fn test_corrupt_snapshot_falls_back_without_overwriting() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("data")).unwrap();
    fs::write(snapshot_path(&tmp), "{ not json").unwrap();

    assert_eq!(ticket_count(&tmp), "3");
    assert_eq!(fs::read_to_string(snapshot_path(&tmp)).unwrap(), "{ not json");
}

#[test]
fn test_newer_version_snapshot_is_not_overwritten_on_read() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp).arg("status").assert().success();

    let saved = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    let future = saved.replacen("\"version\":1", "\"version\":99", 1);
    fs::write(snapshot_path(&tmp), &future).unwrap();

    ophub(&tmp).args(["ticket", "list"]).assert().success();
    assert_eq!(fs::read_to_string(snapshot_path(&tmp)).unwrap(), future);
}

#[test]
fn test_data_path_honours_storage_key() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["data", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(SNAPSHOT_FILE));

    ophub(&tmp)
        .env("OPHUB_STORAGE_KEY", "site-b")
        .args(["data", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site-b.json"));
}

#[test]
fn test_export_to_stdout_is_pretty_and_current() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["data", "export", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": 1"))
        .stdout(predicate::str::contains("\"workOrders\""));
}

#[test]
fn test_export_then_import_restores_data() {
    let tmp = TempDir::new().unwrap();
    let export = tmp.path().join("backup.json");

    ophub(&tmp)
        .args(["data", "export", "--output"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    ophub(&tmp)
        .args(["ticket", "new", "--title", "Temporary"])
        .assert()
        .success();
    assert_eq!(ticket_count(&tmp), "4");

    ophub(&tmp)
        .args(["data", "import", "--yes"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 ticket(s)"));
    assert_eq!(ticket_count(&tmp), "3");
}

#[test]
fn test_import_malformed_fails_and_keeps_data() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{\"version\": 1, \"users\": 5}").unwrap();

    ophub(&tmp)
        .args(["ticket", "new", "--title", "Keep me"])
        .assert()
        .success();

    ophub(&tmp)
        .args(["data", "import", "--yes"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error importing data. Please check the file format.",
        ));
    assert_eq!(ticket_count(&tmp), "4");
}

#[test]
fn test_reset_requires_confirmation() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["ticket", "new", "--title", "Extra"])
        .assert()
        .success();

    // Not attended and no --yes: declined
    ophub(&tmp)
        .args(["data", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert_eq!(ticket_count(&tmp), "4");

    ophub(&tmp).args(["data", "reset", "--yes"]).assert().success();
    assert_eq!(ticket_count(&tmp), "3");
}

// ============================================================================
// Ticket Tests
// ============================================================================

#[test]
fn test_ticket_new_gets_sla_deadline() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args([
            "ticket", "new", "--title", "Roof leak", "--priority", "critical",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("TKT@4"))
        .stdout(predicate::str::contains("SLA deadline"));

    ophub(&tmp)
        .args(["ticket", "show", "TKT@4", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Roof leak\""))
        .stdout(predicate::str::contains("\"slaDeadline\""));
}

#[test]
fn test_ticket_status_change_stamps_resolution() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["ticket", "new", "--title", "Door stuck"])
        .assert()
        .success();

    ophub(&tmp)
        .args(["ticket", "status", "TKT@4", "resolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resolved"));

    let json = stdout_of(ophub(&tmp).args(["ticket", "show", "TKT@4", "-f", "json"]));
    assert!(json.contains("\"status\": \"resolved\""));
    assert!(json.contains("\"resolvedAt\""));

    ophub(&tmp)
        .args(["ticket", "show", "TKT@4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status changed to resolved"));
}

#[test]
fn test_ticket_comment_and_assign() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["ticket", "comment", "TKT@1", "Parts ordered"])
        .assert()
        .success();
    ophub(&tmp)
        .args(["ticket", "assign", "TKT@1", "USR@3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned to Chen Wei"));

    ophub(&tmp)
        .args(["ticket", "show", "TKT@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parts ordered"))
        .stdout(predicate::str::contains("Chen Wei"));

    // The assignee was notified
    ophub(&tmp).args(["user", "switch", "USR@3"]).assert().success();
    ophub(&tmp)
        .args(["notify", "list", "--unread", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"assignment\""));
}

#[test]
fn test_ticket_update_rejects_immutable_fields() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["ticket", "update", "TKT@1", "--json", "{\"createdAt\":\"2020-01-01T00:00:00Z\"}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ticket patch"));

    ophub(&tmp)
        .args(["ticket", "update", "TKT@1", "--json", "{\"priority\":\"low\",\"dueDate\":null}"])
        .assert()
        .success();
    ophub(&tmp)
        .args(["ticket", "show", "TKT@1", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"priority\": \"low\""))
        .stdout(predicate::str::contains("\"dueDate\"").not());
}

#[test]
fn test_ticket_unknown_reference_fails() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["ticket", "show", "TKT@99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No TKT matching"));
}

#[test]
fn test_ticket_delete_does_not_cascade() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp).arg("status").assert().success();
    let before = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    let activities_before = before.matches("\"ACT-").count();

    ophub(&tmp)
        .args(["ticket", "delete", "TKT@1", "--yes"])
        .assert()
        .success();
    assert_eq!(ticket_count(&tmp), "2");

    let after = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    assert_eq!(after.matches("\"ACT-").count(), activities_before);
}

#[test]
fn test_ticket_list_tsv() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(ophub(&tmp).args(["ticket", "list", "-f", "tsv"]));
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some("short\ttitle\tstatus\tpriority\tsla\tassignee\tsite\tcreated")
    );
    assert!(lines.next().is_some_and(|l| l.starts_with("TKT@1\t")));
}

// ============================================================================
// Maintenance Tests
// ============================================================================

#[test]
fn test_asset_new_and_list() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args([
            "asset", "new", "--name", "Chiller", "--tag", "CHL-001", "--category", "HVAC",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AST@4"));

    ophub(&tmp)
        .args(["asset", "list", "--category", "hvac", "--search", "chl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chiller"));
}

#[test]
fn test_work_order_completion() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args([
            "wo", "new", "--title", "Replace filter", "--asset", "AST@1", "--step", "Isolate",
            "--step", "Swap filter",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("WO@4"));

    ophub(&tmp)
        .args(["wo", "status", "WO@4", "completed", "--labor-hours", "1.5"])
        .assert()
        .success();

    let json = stdout_of(ophub(&tmp).args(["wo", "show", "WO@4", "-f", "json"]));
    assert!(json.contains("\"status\": \"completed\""));
    assert!(json.contains("\"completedAt\""));
    assert!(json.contains("\"laborHours\": 1.5"));
    assert!(json.contains("Swap filter"));
}

#[test]
fn test_pm_list_active() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["pm", "list", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

// ============================================================================
// Procurement Tests
// ============================================================================

#[test]
fn test_procurement_lists() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["sup", "list", "--count"])
        .assert()
        .success()
        .stdout("3\n");
    ophub(&tmp)
        .args(["rfq", "list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"awardedQuoteId\""));
    ophub(&tmp)
        .args(["po", "list", "--status", "committed", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_notifications_read_all() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["notify", "read-all"])
        .assert()
        .success();

    ophub(&tmp)
        .args(["notify", "list", "--unread", "-f", "json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_user_switch_marks_current() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["user", "switch", "USR@2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ben Okafor"));

    ophub(&tmp)
        .args(["user", "list", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USR@2\t*\tBen Okafor"));
}

#[test]
fn test_status_json() {
    let tmp = TempDir::new().unwrap();
    ophub(&tmp)
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"openTickets\""))
        .stdout(predicate::str::contains("\"committedSpend\""));
}

#[test]
fn test_import_snapshot_with_foreign_ids() {
    let tmp = TempDir::new().unwrap();
    let uuid = "3f2b9c1e-8d4a-4b7e-9a51-2c6f0d7e8a90";

    let exported = stdout_of(ophub(&tmp).args(["data", "export", "--output", "-"]));
    let mut doc: serde_json::Value = serde_json::from_str(&exported).unwrap();
    doc["users"][1]["id"] = serde_json::json!(uuid);
    let file = tmp.path().join("foreign.json");
    fs::write(&file, doc.to_string()).unwrap();

    ophub(&tmp)
        .args(["data", "import", "--yes"])
        .arg(&file)
        .assert()
        .success();

    ophub(&tmp)
        .args(["user", "switch", uuid])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ben Okafor"));

    // A fresh load keeps the imported ids instead of falling back to demo data
    ophub(&tmp)
        .args(["user", "list", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USR@2\t*\tBen Okafor"));
    let raw = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    assert!(raw.contains(uuid));
}
