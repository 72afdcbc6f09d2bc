//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_linear-clock"))
        .args(args)
        .env("LINEAR_CLOCK_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

#[test]
fn test_status_json() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["status"]);
    assert_eq!(code, 0);
    let status = json(&stdout);
    assert_eq!(status["tasks"], 0);
    assert!(status["progress"].as_f64().is_some());
    assert_eq!(status["configured_range"]["start"], "00:00:00");
}

#[test]
fn test_task_add_list_update_delete() {
    let dir = TempDir::new().unwrap();

    let (code, stdout, stderr) = run_cli(dir.path(), &["task", "add", "9:30 PM", "Review"]);
    assert_eq!(code, 0, "task add failed: {stderr}");
    let task = json(&stdout);
    assert_eq!(task["time"], "21:30:00");
    let id = task["id"].as_str().unwrap().to_string();

    let _ = run_cli(dir.path(), &["task", "add", "08:00", "Coffee"]);
    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    let list = json(&stdout);
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Coffee", "Review"]);

    let (code, _, _) = run_cli(dir.path(), &["task", "update", &id, "--name", "Code review"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert!(stdout.contains("Code review"));

    let (code, _, _) = run_cli(dir.path(), &["task", "delete", &id]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(json(&stdout).as_array().unwrap().len(), 1);
}

#[test]
fn test_task_add_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["task", "add", "soon", "Nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unrecognized time"));

    let (code, _, _) = run_cli(dir.path(), &["task", "add", "10:00", "   "]);
    assert_ne!(code, 0);

    let (code, _, _) = run_cli(dir.path(), &["task", "delete", "missing"]);
    assert_ne!(code, 0);
}

#[test]
fn test_range_set_and_show() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["range", "set", "22:00:00", "06:00:00"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["range", "show"]);
    assert_eq!(code, 0);
    let range = json(&stdout);
    assert_eq!(range["start_time"], "22:00:00");
    assert_eq!(range["duration"], 28_800);
    assert_eq!(range["wraps_midnight"], true);

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "range.end_time"]);
    assert_eq!(stdout.trim(), "06:00:00");
}

#[test]
fn test_range_set_rejects_malformed_time() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["range", "set", "25:00:00", "06:00:00"]);
    assert_ne!(code, 0);
}

#[test]
fn test_position_lookup() {
    let dir = TempDir::new().unwrap();
    let _ = run_cli(dir.path(), &["range", "set", "09:00:00", "17:00:00"]);
    let _ = run_cli(dir.path(), &["task", "add", "13:00", "Midday"]);

    let (code, stdout, _) = run_cli(dir.path(), &["at", "0.5"]);
    assert_eq!(code, 0);
    let at = json(&stdout);
    assert_eq!(at["time"], "13:00:00");
    assert_eq!(at["task"]["name"], "Midday");

    let (_, stdout, _) = run_cli(dir.path(), &["at", "0.1"]);
    assert!(json(&stdout)["task"].is_null());

    let (code, _, _) = run_cli(dir.path(), &["at", "1.5"]);
    assert_ne!(code, 0);
}

#[test]
fn test_import_export() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("agenda.json");
    std::fs::write(
        &input,
        r#"{"tasks":[{"name":"Standup","time":"09:30"},{"title":"Lunch","start_time":"12:00:00"},{"name":"No time"}]}"#,
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(dir.path(), &["import", input.to_str().unwrap()]);
    assert_eq!(code, 0, "import failed: {stderr}");
    let report = json(&stdout);
    assert_eq!(report["imported"], 2);
    assert_eq!(report["skipped"], 1);

    let output = dir.path().join("out.json");
    let (code, _, _) = run_cli(dir.path(), &["export", "--output", output.to_str().unwrap()]);
    assert_eq!(code, 0);
    let exported = json(&std::fs::read_to_string(&output).unwrap());
    assert_eq!(exported["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(exported["tasks"][0]["name"], "Standup");
    assert_eq!(exported["time_range"]["start_time"], "00:00:00");
}

#[test]
fn test_import_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    std::fs::write(&input, "{not json").unwrap();
    let (code, _, _) = run_cli(dir.path(), &["import", input.to_str().unwrap()]);
    assert_ne!(code, 0);
}

#[test]
fn test_focus_unknown_task() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["focus", "enter", "missing"]);
    assert_ne!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "status"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["active"], false);
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(stdout.trim(), "false");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "range.start_time", "noon"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list_and_reset() {
    let dir = TempDir::new().unwrap();
    let _ = run_cli(dir.path(), &["config", "set", "display.screen_index", "2"]);
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["display"]["screen_index"], 2);

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "display.screen_index"]);
    assert_eq!(stdout.trim(), "0");
}
