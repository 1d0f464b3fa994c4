//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a fresh temp
//! directory, so config and database never touch the real profile.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_nakmuay"))
        .args(args)
        .env("HOME", home)
        .env_remove("NAKMUAY_ENV")
        .env_remove("NAKMUAY_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

#[test]
fn test_timer_config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    let config = run_json(home.path(), &["timer", "config", "show"]);
    assert_eq!(config["rounds"], 3);
    assert_eq!(config["roundDuration"], 180);
    assert_eq!(config["restDuration"], 60);
    assert_eq!(config["bellEnabled"], true);
}

#[test]
fn test_timer_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["timer", "config", "set", "--rounds", "5", "--rest-secs", "0"]);
    let config = run_json(home.path(), &["timer", "config", "show"]);
    assert_eq!(config["rounds"], 5);
    assert_eq!(config["restDuration"], 0);
}

#[test]
fn test_timer_config_rejects_zero_round() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["timer", "config", "set", "--round-secs", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_timer_run_records_session() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["timer", "run", "--rounds", "1", "--round-secs", "1", "--rest-secs", "0", "--no-bell"],
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    let last = stdout.lines().last().unwrap();
    let event: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(event["type"], "session_completed");

    let streak = run_json(home.path(), &["stats", "streak"]);
    assert_eq!(streak["currentStreak"], 1);

    // Overrides apply to that run only.
    let config = run_json(home.path(), &["timer", "config", "show"]);
    assert_eq!(config["rounds"], 3);
}

#[test]
fn test_combo_complete_and_progress() {
    let home = tempfile::tempdir().unwrap();
    let record = run_json(home.path(), &["combo", "complete", "jab"]);
    assert_eq!(record["type"], "combo");
    assert_eq!(record["duration"], 5);

    let shown = run_json(home.path(), &["progress", "show"]);
    assert_eq!(shown["progress"]["totalSessions"], 1);

    let weekly = run_json(home.path(), &["stats", "weekly"]);
    assert_eq!(weekly[0]["totalSessions"], 1);
}

#[test]
fn test_combo_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["combo", "show", "flying-armbar"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("flying-armbar"));
}

#[test]
fn test_combo_list_filters() {
    let home = tempfile::tempdir().unwrap();
    let list = run_json(
        home.path(),
        &["combo", "list", "--category", "kicks", "--difficulty", "beginner"],
    );
    let ids: Vec<_> = list.as_array().unwrap().iter().map(|t| t["id"].clone()).collect();
    assert_eq!(ids, vec![serde_json::json!("teep")]);
}

#[test]
fn test_progress_reset_requires_confirmation() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["combo", "complete", "teep"]);
    let (_, _, code) = run_cli(home.path(), &["progress", "reset"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(home.path(), &["progress", "reset", "--yes"]);
    assert_eq!(code, 0);
    let shown = run_json(home.path(), &["progress", "show"]);
    assert_eq!(shown["progress"]["totalSessions"], 0);
}

#[test]
fn test_export_import_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["combo", "complete", "cross"]);
    let bundle = home.path().join("bundle.json");
    let bundle_arg = bundle.to_str().unwrap();
    let (_, _, code) = run_cli(home.path(), &["progress", "export", "--output", bundle_arg]);
    assert_eq!(code, 0);

    let other = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(other.path(), &["progress", "import", bundle_arg]);
    assert_eq!(code, 0, "import failed: {stderr}");
    let shown = run_json(other.path(), &["progress", "show"]);
    assert_eq!(shown["progress"]["totalSessions"], 1);
}

#[test]
fn test_config_show_set_path() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "show", "audio.bell"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "log");

    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "audio.bell", "silent"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "audio.bell = silent");

    let shown = run_json(home.path(), &["config", "show"]);
    assert_eq!(shown["audio"]["bell"], "silent");
    assert_eq!(shown["logging"]["filter"], "warn");

    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(Path::new(stdout.trim()).exists());
    assert!(stdout.trim().ends_with("config.toml"));

    let (_, _, code) = run_cli(home.path(), &["config", "show", "audio.volume"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "audio.bell", "gong"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("log, silent"), "{stderr}");

    let (_, stderr, code) =
        run_cli(home.path(), &["config", "set", "logging.filter", "nakmuay=loud"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("bad log filter"), "{stderr}");

    // Nothing was written.
    let shown = run_json(home.path(), &["config", "show"]);
    assert_eq!(shown["audio"]["bell"], "log");
    assert_eq!(shown["logging"]["filter"], "warn");
}
