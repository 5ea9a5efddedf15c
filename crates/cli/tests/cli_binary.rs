#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn monitor() -> Command {
    let mut cmd = Command::cargo_bin("monitor").unwrap();
    cmd.env_remove("MONITOR_SERVER")
        .env_remove("MONITOR_SUBSCRIPTION")
        .env_remove("MONITOR_LOG");
    cmd
}

#[test]
fn help_lists_command_groups() {
    monitor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage metric alert rules"))
        .stdout(predicate::str::contains("alert"))
        .stdout(predicate::str::contains("group"));
}

#[test]
fn version_flag() {
    monitor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor"));
}

#[test]
fn version_json() {
    monitor()
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_version\": \"2016-03-01\""));
}

#[test]
fn alert_create_help_shows_condition_usage() {
    monitor()
        .args(["alert", "create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("THRESHOLD"))
        .stdout(predicate::str::contains("--email-service-owners"));
}

#[test]
fn create_without_condition_is_usage_error() {
    monitor()
        .args(["alert", "create", "-g", "rg", "-n", "r", "--target", "vm1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--condition"));
}

#[test]
fn missing_config_file_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yml");
    monitor()
        .args(["--json", "--config", path.to_str().unwrap(), "alert", "list", "-g", "rg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.yml"));
}

#[test]
fn bad_action_type_fails_before_network() {
    monitor()
        .args([
            "--json",
            "--server",
            "http://127.0.0.1:9",
            "--subscription",
            "s",
            "alert",
            "create",
            "-g",
            "rg",
            "-n",
            "r",
            "--target",
            "/subscriptions/s/x",
            "--condition",
            "Percentage CPU > 90 avg 5m",
            "-a",
            "sms",
            "555",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TYPE KEY [ARGS]"));
}

#[test]
fn config_path_honors_flag() {
    monitor()
        .args(["--config", "/tmp/custom-monitor.yml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/custom-monitor.yml"));
}

#[test]
fn config_validate_reports_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "endpoint: \"\"\nsubscription_id: s\n").unwrap();
    monitor()
        .args(["--json", "--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": false"));
}
