//! End-to-end checks of the command-line binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::config::{temp_config, UNREACHABLE_SOURCE};

fn edgewatch() -> Command {
    let mut cmd = Command::cargo_bin("edgewatch").unwrap();
    for var in [
        "PORT",
        "POLL_INTERVAL",
        "SHEETS_SYNC_INTERVAL",
        "GOOGLE_SHEET_ID",
        "GOOGLE_SERVICE_ACCOUNT_EMAIL",
        "GOOGLE_PRIVATE_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    edgewatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_config_accepts_valid_file() {
    let file = temp_config(UNREACHABLE_SOURCE);
    edgewatch()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("Sheet sync: disabled"));
}

#[test]
fn check_config_reports_missing_credentials() {
    let file = temp_config("[sheets]\nworksheet_title = \"Edges\"\n");
    edgewatch()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("GOOGLE_SHEET_ID"))
        .stdout(predicate::str::contains("GOOGLE_PRIVATE_KEY"));
}

#[test]
fn check_config_rejects_invalid_values() {
    let file = temp_config("[poll]\ninterval_ms = 0\n");
    edgewatch()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll.interval_ms"));
}

#[test]
fn check_config_rejects_missing_file() {
    edgewatch()
        .args(["check", "config", "--config", "/nonexistent/edgewatch.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn check_config_rejects_bad_env_override() {
    let file = temp_config(UNREACHABLE_SOURCE);
    edgewatch()
        .env("PORT", "not-a-port")
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn scan_fails_when_source_is_unreachable() {
    let file = temp_config(UNREACHABLE_SOURCE);
    edgewatch()
        .args(["scan", "--config"])
        .arg(file.path())
        .assert()
        .failure();
}
