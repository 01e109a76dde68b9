//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points the config directory at its own temp dir.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "chronodeck-cli", "--"])
        .args(args)
        .env("CHRONODECK_CONFIG_DIR", config_dir)
        .env("CHRONODECK_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_clock_once_json() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["clock", "--once", "--json"]);
    assert_eq!(code, 0, "clock --once failed: {stderr}");

    let sample: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(sample["hours"].as_u64().unwrap() < 24);
    assert!(sample["minutes"].as_u64().unwrap() < 60);
    assert!(!sample["date"].as_str().unwrap().is_empty());
    assert!(!sample["timezone"].as_str().unwrap().is_empty());
}

#[test]
fn test_presets_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["presets"]);
    assert_eq!(code, 0, "presets failed");
    let labels: Vec<_> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(labels, ["1m", "5m", "10m", "15m", "30m", "1h"]);
}

#[test]
fn test_presets_json() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["presets", "--json"]);
    assert_eq!(code, 0, "presets --json failed");
    let presets: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(presets[1]["duration_ms"], 300_000);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.default_duration_ms"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "300000");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timer.default_duration_ms", "90000"]);
    assert_eq!(code, 0, "config set failed");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.default_duration_ms"]);
    assert_eq!(stdout.trim(), "90000");
}

#[test]
fn test_config_get_unset_label_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "clock.timezone_label"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "\n");
}

#[test]
fn test_config_rejects_bad_mode() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "general.default_mode", "alarm"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("timer.nope"));
}

#[test]
fn test_timer_unknown_preset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "--preset", "7m"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("7m"), "{stderr}");
}

#[test]
fn test_timer_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["timer", "--duration", "300ms", "--json", "--no-sound"],
    );
    assert_eq!(code, 0, "timer failed: {stderr}");

    let types: Vec<String> = stdout
        .lines()
        .map(|l| {
            let value: serde_json::Value = serde_json::from_str(l)
                .unwrap_or_else(|e| panic!("stdout line is not JSON ({e}): {l:?}"));
            value["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(types.iter().any(|t| t == "TimerStarted"));
    assert!(types.iter().any(|t| t == "StateSnapshot"));
    assert_eq!(types.last().map(String::as_str), Some("TimerCompleted"));
    assert!(stderr.contains("Timer Complete!"), "banner goes to stderr: {stderr}");
}

#[test]
fn test_clock_json_streams_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_chronodeck"))
        .args(["clock", "--json"])
        .env("CHRONODECK_CONFIG_DIR", dir.path())
        .env("CHRONODECK_LOG", "off")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");

    let stdout = child.stdout.take().unwrap();
    let lines: Vec<String> = BufReader::new(stdout)
        .lines()
        .take(2)
        .map(|l| l.unwrap())
        .collect();
    child.kill().unwrap();
    child.wait().unwrap();

    assert_eq!(lines.len(), 2);
    for line in &lines {
        let snapshot: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(snapshot["type"], "StateSnapshot");
        assert_eq!(snapshot["mode"], "clock");
        assert_eq!(snapshot["readout"].as_str().unwrap().len(), 8);
    }
    assert_ne!(lines[0], lines[1], "each snapshot is a new second");
}

#[test]
fn test_timer_rejects_bad_duration() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "--duration", "soon"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("soon"), "{stderr}");
}
