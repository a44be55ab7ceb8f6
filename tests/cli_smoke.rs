//! End-to-end CLI checks through the compiled binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::TestWorkspace;

fn tempo() -> Command {
    Command::cargo_bin("tempo").expect("binary built")
}

#[test]
fn help_lists_subcommands() {
    tempo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("order"))
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("hours"));
}

#[test]
fn order_prints_engine_sequence() {
    let ws = TestWorkspace::new();
    let snapshot = ws.write_snapshot(&support::fixture_snapshot());

    let output = tempo()
        .arg("--json")
        .arg("--config-dir")
        .arg(ws.path())
        .arg("order")
        .arg(&snapshot)
        .arg("--today")
        .arg("2024-03-10")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["command"], "order");
    // Both retainers at zero hours: snapshot grouping order holds, then
    // the regular project's task.
    let order: Vec<i64> = envelope["data"]["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![101, 102, 103]);
}

#[test]
fn complete_then_hours_round_trips_through_the_ledger() {
    let ws = TestWorkspace::new();
    let snapshot = ws.write_snapshot(&support::fixture_snapshot());

    tempo()
        .arg("--json")
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("complete")
        .arg(&snapshot)
        .arg("--task")
        .arg("101")
        .arg("--at")
        .arg("2024-03-10T10:30:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hours\": 1.5"));

    let output = tempo()
        .arg("--json")
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("hours")
        .arg("--project")
        .arg("1")
        .arg("--day")
        .arg("2024-03-10")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["data"]["hours"], 1.5);
    assert_eq!(envelope["data"]["at_quota"], false);
}

#[test]
fn quota_reached_defers_project_from_order() {
    let ws = TestWorkspace::new();
    let snapshot = ws.write_snapshot(&support::fixture_snapshot());

    tempo()
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("log")
        .arg("--project")
        .arg("1")
        .arg("--day")
        .arg("2024-03-10")
        .arg("--hours")
        .arg("3.0")
        .assert()
        .success();

    let output = tempo()
        .arg("--json")
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("order")
        .arg(&snapshot)
        .arg("--today")
        .arg("2024-03-10")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let order: Vec<i64> = envelope["data"]["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![102, 103]);
    assert_eq!(envelope["data"]["deferred_projects"][0], 1);
}

#[test]
fn complete_unknown_task_exits_with_user_error() {
    let ws = TestWorkspace::new();
    let snapshot = ws.write_snapshot(&support::fixture_snapshot());

    tempo()
        .arg("--config-dir")
        .arg(ws.path())
        .arg("complete")
        .arg(&snapshot)
        .arg("--task")
        .arg("999")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn missing_snapshot_exits_with_user_error() {
    let ws = TestWorkspace::new();

    tempo()
        .arg("--config-dir")
        .arg(ws.path())
        .arg("order")
        .arg(ws.path().join("absent.json"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Snapshot not found"));
}

#[test]
fn config_overrides_quota_cap() {
    let ws = TestWorkspace::new();
    ws.write_config("[quota]\ndaily_hours_cap = 1.0\n");
    let snapshot = ws.write_snapshot(&support::fixture_snapshot());

    tempo()
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("log")
        .arg("--project")
        .arg("2")
        .arg("--day")
        .arg("2024-03-10")
        .arg("--hours")
        .arg("1.0")
        .assert()
        .success();

    let output = tempo()
        .arg("--json")
        .arg("--config-dir")
        .arg(ws.path())
        .arg("--ledger")
        .arg(ws.ledger_path())
        .arg("order")
        .arg(&snapshot)
        .arg("--today")
        .arg("2024-03-10")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["data"]["deferred_projects"][0], 2);
}
