//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, each subcommand
//! responds to `--help`, and lookups fail cleanly without network access.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `jable-info` binary with no ambient credentials.
fn jable() -> Command {
    let mut cmd = Command::cargo_bin("jable-info").expect("binary 'jable-info' should be built");
    cmd.env_remove("BROWSERLESS_API_KEY")
        .env_remove("BROWSERLESS_ENDPOINT")
        .env_remove("PORT")
        .env("RUST_LOG", "off");
    cmd
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    jable()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: jable-info"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("video"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn version_flag_shows_semver() {
    jable()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^jable-info \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    jable()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: jable-info"));
}

#[test]
fn invalid_subcommand_fails() {
    jable()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn serve_help() {
    jable()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run the HTTP API"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--bind"));
}

#[test]
fn video_help() {
    jable()
        .args(["video", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Look up one video code"))
        .stdout(predicate::str::contains("<CODE>"));
}

#[test]
fn serve_rejects_bad_port() {
    jable()
        .args(["serve", "--port", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─── Offline failures ────────────────────────────────────────────────────────

#[test]
fn video_rejects_malformed_code() {
    jable()
        .args(["video", "not a code"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match LETTERS-NUMBERS"));
}

#[test]
fn video_without_key_reports_missing_credential() {
    jable()
        .args(["video", "abc-123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn probe_without_key_fails() {
    jable()
        .arg("probe")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn missing_config_file_is_reported() {
    jable()
        .args(["--config", "/nonexistent/jable-info.toml", "video", "abc-123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
