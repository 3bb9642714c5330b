//! Integration tests for rsvp-cli
//!
//! These tests verify the CLI commands work end-to-end against a throwaway
//! client storage and an auth service address that refuses connections.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Address with nothing listening
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// Get a Command for the rsvp binary with isolated storage
fn rsvp(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rsvp").unwrap();
    cmd.env("RSVP_DB_PATH", temp_dir.path().join("client.db"))
        .env("RSVP_API_URL", UNREACHABLE_API)
        .env("RSVP_HTTP_TIMEOUT_SECS", "5")
        .env_remove("RSVP_PASSWORD")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy");
    cmd
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rsvp"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"));
}

#[test]
#[serial]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rsvp"));
}

#[test]
#[serial]
fn test_register_help_lists_form_fields() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["register", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--first-name"))
        .stdout(predicate::str::contains("--major"))
        .stdout(predicate::str::contains("--agree-to-terms"));
}

// =============================================================================
// Session Command Tests
// =============================================================================

#[test]
#[serial]
fn test_whoami_without_session_needs_no_network() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"))
        .stdout(predicate::str::contains("anonymous"));
}

#[test]
#[serial]
fn test_whoami_json_output() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["whoami", "--format", "json", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"anonymous\""));
}

#[test]
#[serial]
fn test_logout_without_session_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));
}

#[test]
#[serial]
fn test_login_with_unreachable_service_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["login", "--email", "student@college.edu", "--password", "correctpass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not reach the auth service"))
        .stderr(predicate::str::contains("Error"));

    rsvp(&temp_dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("anonymous"));
}

#[test]
#[serial]
fn test_login_requires_password() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["login", "--email", "student@college.edu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
#[serial]
fn test_config_show_reports_env_values() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RSVP_API_URL"))
        .stdout(predicate::str::contains(UNREACHABLE_API))
        .stdout(predicate::str::contains("\"source\": \"env\""));
}

#[test]
#[serial]
fn test_config_flag_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["config", "get", "RSVP_API_URL", "--api-url", "http://example.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RSVP_API_URL = http://example.test"));
}

#[test]
#[serial]
fn test_config_get_unknown_key_fails() {
    let temp_dir = TempDir::new().unwrap();
    rsvp(&temp_dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config key not found"));
}
