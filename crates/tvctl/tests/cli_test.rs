//! Integration tests for the `tvctl` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a device. Device commands run against a fake `adb` script that
//! answers with canned dumpsys output.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const DEVICES_JSON: &str = r#"{"den": {"ip": "10.0.0.9", "port": 5555, "name": "Den TV"}}"#;

/// Build a command for the `tvctl` binary with env isolation.
///
/// Clears all `TVCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tvctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tvctl");
    cmd.env("HOME", "/tmp/tvctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tvctl-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("TVCTL_DEVICE")
        .env_remove("TVCTL_DEVICES")
        .env_remove("TVCTL_CONFIG")
        .env_remove("TVCTL_ADB")
        .env_remove("TVCTL_TIMEOUT")
        .env_remove("TVCTL_OUTPUT")
        .env_remove("TVCTL_DEFAULT_DEVICE");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Fake `adb` that answers by matching on its joined arguments.
#[cfg(unix)]
fn fake_adb(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("adb");
    let script = r#"#!/bin/sh
case "$*" in
  *get-state*) echo device ;;
  *"pm list packages"*)
    printf 'package:com.netflix.ninja\npackage:com.android.settings\npackage:com.google.android.youtube.tv\n' ;;
  *mWakefulness*)
    printf 'mWakefulness=Awake\nmCurrentFocus=Window{1 u0 com.netflix.ninja/com.netflix.ninja.PlayerActivity}\nstate=PlaybackState {state=3, position=1000, speed=1.0}\ndescription=Dark, S1:E1, null\n' ;;
  *media_session*)
    printf 'Sessions Stack:\n  state=PlaybackState {state=3, position=1000, speed=1.0}\n' ;;
  *) exit 0 ;;
esac
"#;
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// `tvctl` wired to one `den` device and the fake bridge.
#[cfg(unix)]
fn device_cmd(dir: &TempDir) -> assert_cmd::Command {
    let adb = fake_adb(dir.path());
    let mut cmd = tvctl_cmd();
    cmd.env("TVCTL_DEVICES", DEVICES_JSON).arg("--adb").arg(adb);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tvctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tvctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Android TV")
            .and(predicate::str::contains("play"))
            .and(predicate::str::contains("navigate"))
            .and(predicate::str::contains("volume")),
    );
}

#[test]
fn test_version_flag() {
    tvctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tvctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tvctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tvctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_normalize_plain() {
    tvctl_cmd()
        .args([
            "-o",
            "plain",
            "normalize",
            "https://www.netflix.com/title/80057281",
            "https://example.com/video",
        ])
        .assert()
        .success()
        .stdout("http://www.netflix.com/watch/80057281\nhttps://example.com/video\n");
}

#[test]
fn test_normalize_json_names_service() {
    tvctl_cmd()
        .args(["-o", "json", "normalize", "netflix://title/80057281"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""service": "netflix""#));
}

#[test]
fn test_config_path_honours_flag() {
    tvctl_cmd()
        .args(["--config", "/tmp/tvctl-test/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout("/tmp/tvctl-test/custom.toml\n");
}

#[test]
fn test_config_show_no_config() {
    tvctl_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_add_device_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    tvctl_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "add-device", "den", "--host", "10.0.0.9", "--name", "Den TV"])
        .assert()
        .success();

    tvctl_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#"default_device = "den""#)
                .and(predicate::str::contains("10.0.0.9")),
        );
}

#[test]
fn test_config_edits_keep_device_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    for (id, host) in [("zulu", "10.0.0.3"), ("alpha", "10.0.0.4"), ("mike", "10.0.0.5")] {
        tvctl_cmd()
            .arg("--config")
            .arg(&path)
            .args(["config", "add-device", id, "--host", host])
            .assert()
            .success();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let zulu = text.find("[devices.zulu]").unwrap();
    let alpha = text.find("[devices.alpha]").unwrap();
    let mike = text.find("[devices.mike]").unwrap();
    assert!(zulu < alpha && alpha < mike, "devices reordered:\n{text}");
}

#[test]
fn test_config_set_default_unknown_device() {
    let dir = tempfile::tempdir().unwrap();
    let output = tvctl_cmd()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["config", "set-default", "attic"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = tvctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_without_devices_needs_selection() {
    let output = tvctl_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No device selected"));
}

#[test]
fn test_unknown_device_exit_code() {
    let output = tvctl_cmd()
        .env("TVCTL_DEVICES", DEVICES_JSON)
        .args(["-d", "attic", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("attic"));
}

#[test]
fn test_missing_adb_is_connection_error() {
    let output = tvctl_cmd()
        .env("TVCTL_DEVICES", DEVICES_JSON)
        .args(["--adb", "/nonexistent/tvctl-test/adb", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("adb"));
}

#[test]
fn test_invalid_output_format() {
    let output = tvctl_cmd()
        .args(["--output", "invalid", "devices"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ── Against a fake bridge ───────────────────────────────────────────

#[cfg(unix)]
#[test]
fn test_status_json() {
    let dir = tempfile::tempdir().unwrap();
    device_cmd(&dir)
        .args(["-o", "json", "status", "--fresh"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""playback": "playing""#)
                .and(predicate::str::contains(r#""media_title": "Dark""#))
                .and(predicate::str::contains("com.netflix.ninja")),
        );
}

#[cfg(unix)]
#[test]
fn test_status_summary() {
    let dir = tempfile::tempdir().unwrap();
    device_cmd(&dir)
        .args(["status", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Den TV: Screen on"));
}

#[cfg(unix)]
#[test]
fn test_devices_plain() {
    let dir = tempfile::tempdir().unwrap();
    device_cmd(&dir)
        .args(["-o", "plain", "devices"])
        .assert()
        .success()
        .stdout("den\n");
}

#[cfg(unix)]
#[test]
fn test_apps_lists_streaming_packages() {
    let dir = tempfile::tempdir().unwrap();
    device_cmd(&dir)
        .args(["-o", "plain", "apps"])
        .assert()
        .success()
        .stdout("com.google.android.youtube.tv\ncom.netflix.ninja\n");
}

#[cfg(unix)]
#[test]
fn test_apps_resolve() {
    let dir = tempfile::tempdir().unwrap();
    device_cmd(&dir)
        .args(["apps", "--resolve", "youtube"])
        .assert()
        .success()
        .stdout("youtube: com.google.android.youtube.tv\n");
}

#[cfg(unix)]
#[test]
fn test_navigate_invalid_action() {
    let dir = tempfile::tempdir().unwrap();
    let output = device_cmd(&dir).args(["nav", "sideways"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("sideways"), "{text}");
    assert!(text.contains("up, down, left, right"), "{text}");
}

#[cfg(unix)]
#[test]
fn test_play_pause_unchanged_state_fails() {
    // The fake session reports playing before and after the toggle.
    let dir = tempfile::tempdir().unwrap();
    let output = device_cmd(&dir).arg("play-pause").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("state did not change (still playing)"), "{text}");
}

#[cfg(unix)]
#[test]
fn test_play_pause_json_reports_result_object() {
    let dir = tempfile::tempdir().unwrap();
    let output = device_cmd(&dir)
        .args(["-o", "json", "play-pause"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains(r#""is_error": true"#));
}
