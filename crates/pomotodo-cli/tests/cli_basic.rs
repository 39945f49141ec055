//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify its JSON output.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotodo"))
        .args(args)
        .env("POMOTODO_DATA_DIR", data_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "backlog", "Write report"]);
    assert_eq!(task["content"], "Write report");
    assert_eq!(task["completed"], false);

    let lists = run_json(dir.path(), &["task", "list"]);
    assert_eq!(lists["backlog"][0]["id"], task["id"]);
    assert!(lists["active"].as_array().unwrap().is_empty());

    let backlog = run_json(dir.path(), &["task", "list", "today"]);
    assert_eq!(backlog.as_array().unwrap().len(), 1);
}

#[test]
fn test_task_add_rejects_empty_content() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "active", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(dir.path(), &["task", "add", "completed", "nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_toggle_backlog_task_completes_it() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "backlog", "Water plants"]);
    let id = task["id"].as_str().unwrap();

    let result = run_json(dir.path(), &["task", "toggle", "backlog", id]);
    assert_eq!(result["changed"], true);
    assert_eq!(result["lists"]["completed"][0]["id"], id);
    assert_eq!(result["lists"]["completed"][0]["completed"], true);
}

#[test]
fn test_drag_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "active", "Review PR"]);
    let id = task["id"].as_str().unwrap();

    let result = run_json(dir.path(), &["task", "drag", id, "completed"]);
    assert_eq!(result["resolution"]["outcome"], "transfer");
    assert_eq!(result["lists"]["completed"][0]["completed"], true);

    let result = run_json(dir.path(), &["task", "drag", id, "backlog"]);
    assert_eq!(result["lists"]["backlog"][0]["id"], id);
    assert_eq!(result["lists"]["backlog"][0]["completed"], false);

    let result = run_json(dir.path(), &["task", "drag", id]);
    assert_eq!(result["resolution"]["outcome"], "no_op");
}

#[test]
fn test_settings_validation() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["settings", "work", "abc"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("work_duration"));

    let (_, _, code) = run_cli(dir.path(), &["settings", "break", "0"]);
    assert_eq!(code, 1);

    let settings = run_json(dir.path(), &["settings", "work", "90"]);
    assert_eq!(settings["work_duration"], 90);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["phase"], "work");
    assert_eq!(status["remaining_secs"], 90.0);
    assert_eq!(status["display"], "01:30");
    assert_eq!(status["running"], false);
}

#[test]
fn test_timer_run_completes_short_phase() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["settings", "work", "1"]);

    let (stdout, stderr, code) = run_cli(dir.path(), &["timer", "run"]);
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("\"WorkPhaseComplete\""));

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["phase"], "break");
    assert_eq!(status["completed_pomodoro_count"], 1);
    assert_eq!(status["running"], false);

    let status = run_json(dir.path(), &["timer", "reset"]);
    assert_eq!(status["phase"], "work");
    assert_eq!(status["completed_pomodoro_count"], 0);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "session.work_duration"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1500");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "enabled = false");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(stdout.trim(), "false");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "session.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_session_defaults_apply_to_fresh_data() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "session.work_duration", "600"]);
    assert_eq!(code, 0);
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["remaining_secs"], 600.0);
}

#[test]
fn test_config_list_shows_sections_with_durations() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "[session]");
    assert!(lines.contains(&"work_duration = 1500  # seconds (25:00)"));
    assert!(lines.contains(&"break_duration = 300  # seconds (05:00)"));
    assert!(lines.contains(&"[notifications]"));
    assert!(lines.contains(&"level = \"info\""));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "session"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("[session]\n"));
    assert!(!stdout.contains("[logging]"));

    let json = run_json(dir.path(), &["config", "list", "--json"]);
    assert_eq!(json["session"]["target_pomodoro_count"], 4);
}
