//! Integration tests for the `pingboard` CLI binary.
//!
//! Everything here runs without network access: endpoint lists come from
//! temp files and probe targets are rejected before any packet is sent.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pingboard` binary with env isolation.
///
/// Clears `PINGBOARD_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn pingboard_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pingboard");
    cmd.env("HOME", "/tmp/pingboard-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pingboard-cli-test-nonexistent")
        .env_remove("PINGBOARD_CONFIG")
        .env_remove("PINGBOARD_OUTPUT")
        .env_remove("PINGBOARD_API_KEY")
        .env_remove("PINGBOARD_SOURCE__KIND")
        .env_remove("PINGBOARD_SOURCE__SPREADSHEET_ID")
        .env_remove("PINGBOARD_SOURCE__API_KEY")
        .env_remove("PINGBOARD_PROBE__CONCURRENCY")
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    pingboard_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("HTML status page")
            .and(predicate::str::contains("check"))
            .and(predicate::str::contains("--source-file"))
            .and(predicate::str::contains("--concurrency")),
    );
}

#[test]
fn test_version_flag() {
    pingboard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pingboard"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    pingboard_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    pingboard_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Pipeline runs ───────────────────────────────────────────────────

#[test]
fn test_empty_source_writes_empty_report() {
    let tmp = tempfile::tempdir().unwrap();
    let hosts = tmp.path().join("hosts.csv");
    let out = tmp.path().join("site");
    write(&hosts, "identifier,label\n# nothing yet\n");

    pingboard_cmd()
        .arg("--source-file")
        .arg(&hosts)
        .arg("--out-dir")
        .arg(&out)
        .args(["--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""total": 0"#));

    let html = std::fs::read_to_string(out.join("connectivity_report.html")).unwrap();
    assert!(html.contains("No endpoints were listed."));
    assert!(out.join("status_chart.svg").exists());
}

#[test]
fn test_invalid_identifiers_are_reported_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let hosts = tmp.path().join("hosts.csv");
    let out = tmp.path().join("site");
    write(&hosts, "-oops,Broken entry\n-also-bad,<b>Second</b>\n");

    let output = pingboard_cmd()
        .arg("--source-file")
        .arg(&hosts)
        .arg("--out-dir")
        .arg(&out)
        .args(["--output", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["unreachable"], 2);
    assert_eq!(summary["errors"]["invalid_identifier"], 2);
    assert_eq!(summary["outcomes"][0]["endpoint"]["label"], "Broken entry");

    let html = std::fs::read_to_string(out.join("connectivity_report.html")).unwrap();
    assert!(html.contains("Unreachable: 2"));
    assert!(html.contains("&lt;b&gt;Second&lt;"));
    let first = html.find(">Broken entry</a>").unwrap();
    let second = html.find("Second&lt;").unwrap();
    assert!(first < second);
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_missing_source_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("site");

    pingboard_cmd()
        .arg("--source-file")
        .arg(tmp.path().join("absent.csv"))
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not read endpoints"));

    assert!(!out.join("connectivity_report.html").exists());
}

#[test]
fn test_sheets_source_without_spreadsheet_id() {
    pingboard_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("spreadsheet_id"));
}

#[test]
fn test_invalid_timeout_is_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    let hosts = tmp.path().join("hosts.csv");
    write(&hosts, "");

    pingboard_cmd()
        .arg("--source-file")
        .arg(&hosts)
        .args(["--timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("probe.timeout"));
}

#[test]
fn test_explicit_missing_config_fails() {
    pingboard_cmd()
        .args(["--config", "/tmp/pingboard-cli-test-nonexistent/none.toml"])
        .args(["config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_subcommand() {
    pingboard_cmd().arg("foobar").assert().failure();
}

// ── check ───────────────────────────────────────────────────────────

#[test]
fn test_check_requires_hosts() {
    pingboard_cmd().arg("check").assert().code(2);
}

#[test]
fn test_check_plain_output() {
    pingboard_cmd()
        .args(["check", "--output", "plain", "--", "-bogus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-bogus invalid_identifier"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    pingboard_cmd()
        .args(["--config", "/etc/pingboard/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/pingboard/custom.toml"));
}

#[test]
fn test_config_init_then_show() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("pingboard.toml");

    pingboard_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));
    assert!(path.exists());

    pingboard_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    pingboard_cmd()
        .arg("--config")
        .arg(&path)
        .env("PINGBOARD_PROBE__CONCURRENCY", "5")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("concurrency = 5")
                .and(predicate::str::contains(r#"range = "Dashboard""#)),
        );
}

#[test]
fn test_config_show_masks_plaintext_key() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("pingboard.toml");
    write(&path, "[source]\nspreadsheet_id = \"1AbC\"\napi_key = \"AIza-secret-value\"\n");

    pingboard_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("AIza-secret-value")
                .not()
                .and(predicate::str::contains(r#"api_key = "********""#)),
        );
}

#[test]
fn test_config_set_key_rejects_empty_input() {
    pingboard_cmd()
        .args(["config", "set-key"])
        .write_stdin("\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be empty"));
}
