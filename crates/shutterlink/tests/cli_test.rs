//! Integration tests for the `shutterlink` CLI binary.
//!
//! These cover argument parsing, help output, shell completions,
//! configuration handling, and the errors raised before any controller
//! is contacted.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shutterlink` binary with env isolation.
///
/// Clears `SHUTTERLINK_*` variables and points the config directories
/// at `home` so tests never touch the user's real configuration.
fn shutterlink_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shutterlink");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SHUTTERLINK_PROFILE")
        .env_remove("SHUTTERLINK_REQREP")
        .env_remove("SHUTTERLINK_PUBLISHER")
        .env_remove("SHUTTERLINK_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = shutterlink_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("camera controller")
                .and(predicate::str::contains("shoot"))
                .and(predicate::str::contains("listen"))
                .and(predicate::str::contains("set-property"))
                .and(predicate::str::contains("set-options")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shutterlink"));
}

#[test]
fn test_trigger_is_an_alias_for_shoot() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["trigger", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bulb"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = shutterlink_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = shutterlink_cmd(home.path())
        .args(["--output", "invalid", "ls"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_unknown_property_lists_choices() {
    let home = tempfile::tempdir().unwrap();
    let output = shutterlink_cmd(home.path())
        .args(["set-property", "Zoom", "2"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("ShutterSpeed") && text.contains("MirrorLockup"),
        "Expected the property choices:\n{text}"
    );
}

#[test]
fn test_camera_and_group_conflict() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["shoot", "--camera", "d1", "--group", "studio"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_capture_cycle_needs_at_least_one_loop() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["test", "--loops", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--loops"));
}

// ── Errors before connecting ────────────────────────────────────────

#[test]
fn test_deactivate_requires_yes() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .arg("deactivate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_set_options_without_options() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .arg("set-options")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--sequence"));
}

#[test]
fn test_http_endpoint_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["--reqrep", "http://127.0.0.1:54544", "ls"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("endpoint"));
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["--profile", "nope", "ls"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope").and(predicate::str::contains("default")));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval_ms"));
}

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_set() {
    let home = tempfile::tempdir().unwrap();

    shutterlink_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();

    // A second init refuses to clobber the file.
    shutterlink_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    shutterlink_cmd(home.path())
        .args(["config", "set", "reqrep", "tcp://10.1.2.3:54544"])
        .assert()
        .success();

    shutterlink_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tcp://10.1.2.3:54544"));
}

#[test]
fn test_config_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    shutterlink_cmd(home.path())
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path"))
                .and(predicate::str::contains("set")),
        );
}
