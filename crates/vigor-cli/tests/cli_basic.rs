//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_vigor"))
        .args(args)
        .env("VIGOR_DATA_DIR", data_dir.path())
        .env_remove("VIGOR_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_reward_is_within_band() {
    let dir = TempDir::new().unwrap();
    let out = run_json(&dir, &["reward", "--base-xp", "100", "--seed", "3"]);
    let final_xp = out["final_xp"].as_f64().unwrap();
    assert!((80.0..=300.0).contains(&final_xp));
    assert!(out["rationale"].as_str().unwrap().contains(&format!("{final_xp:.0}")));
}

#[test]
fn test_reward_same_seed_same_output() {
    let dir = TempDir::new().unwrap();
    let a = run_json(&dir, &["reward", "--base-xp", "50", "--seed", "42"]);
    let b = run_json(&dir, &["reward", "--base-xp", "50", "--seed", "42"]);
    assert_eq!(a, b);
}

#[test]
fn test_negative_reward_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["reward", "--base-xp=-5"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("base_xp"));
}

#[test]
fn test_flow_assess() {
    let dir = TempDir::new().unwrap();
    let out = run_json(&dir, &["flow", "assess", "--skill", "7", "--difficulty", "8"]);
    assert_eq!(out["metrics"]["flow_zone_status"], "flow");
    assert!(out.get("adjustment").is_none());

    let out = run_json(
        &dir,
        &[
            "flow",
            "assess",
            "--skill",
            "5",
            "--difficulty",
            "9",
            "--completion-rate",
            "0.3",
            "--frustration",
            "0.8",
        ],
    );
    assert_eq!(out["metrics"]["flow_zone_status"], "anxiety");
    assert_eq!(out["adjustment"]["suggestion_type"], "decrease");
}

#[test]
fn test_streak_lifecycle() {
    let dir = TempDir::new().unwrap();
    let day1 = "2026-07-01T09:00:00Z";
    let day2 = "2026-07-02T09:30:00Z";

    let out = run_json(&dir, &["streak", "record", "--user", "kim", "--at", day1]);
    assert_eq!(out["current_length"], 1);
    let out = run_json(&dir, &["streak", "record", "--user", "kim", "--at", day2]);
    assert_eq!(out["current_length"], 2);

    let status = run_json(
        &dir,
        &["streak", "status", "--user", "kim", "--at", "2026-07-03T07:30:00Z"],
    );
    assert_eq!(status["assessment"]["risk_level"], "critical");
    assert!(status["notification"]["message"].as_str().unwrap().contains("2-day"));

    let frozen = run_json(
        &dir,
        &["streak", "freeze", "--user", "kim", "--at", "2026-07-03T08:00:00Z"],
    );
    assert_eq!(frozen["freezes_used"], 1);

    let reset = run_json(&dir, &["streak", "reset", "--user", "kim"]);
    assert_eq!(reset["current_length"], 0);
    assert_eq!(reset["longest_ever"], 2);
    assert!(dir.path().join("users").join("kim.json").exists());
}

#[test]
fn test_freeze_without_activity_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["streak", "freeze", "--user", "new"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no recorded activity"));
}

#[test]
fn test_wellness_log_and_check() {
    let dir = TempDir::new().unwrap();
    run_json(
        &dir,
        &[
            "wellness",
            "log",
            "--user",
            "sam",
            "--minutes",
            "45",
            "--activity",
            "task_work",
            "--at",
            "2026-07-01T10:00:00Z",
        ],
    );
    let report = run_json(
        &dir,
        &["wellness", "check", "--user", "sam", "--at", "2026-07-01T18:00:00Z"],
    );
    assert_eq!(report["analysis"]["patterns"]["daily_active_minutes"], 45.0);
    assert!(report["boundaries"].as_array().unwrap().len() >= 2);
    assert!(report["intervention"].is_null());
}

#[test]
fn test_wellness_check_rejects_bad_input_and_keeps_state() {
    let dir = TempDir::new().unwrap();
    let users = dir.path().join("users");
    std::fs::create_dir_all(&users).unwrap();
    let snapshot = users.join("kim.json");
    let critical = r#"{
  "wellness": {
    "burnout_risk": "critical",
    "sustainability_score": 0.3,
    "wellness_streak": 0,
    "balance_index": 0.2,
    "engagement_health": "problematic",
    "intervention_needed": true
  }
}"#;
    std::fs::write(&snapshot, critical).unwrap();

    let (stdout, stderr, code) =
        run_cli(&dir, &["wellness", "check", "--user", "kim", "--stress", "4"]);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("stress_level"));
    assert_eq!(std::fs::read_to_string(&snapshot).unwrap(), critical);

    let (_, _, code) = run_cli(
        &dir,
        &["wellness", "check", "--user", "kim", "--session-minutes=-10"],
    );
    assert_ne!(code, 0);
    assert_eq!(std::fs::read_to_string(&snapshot).unwrap(), critical);
}

#[test]
fn test_wellness_health_history_carries_over() {
    let dir = TempDir::new().unwrap();
    let at = "2026-07-01T18:00:00Z";
    run_json(
        &dir,
        &[
            "wellness",
            "log",
            "--user",
            "lee",
            "--minutes",
            "45",
            "--at",
            "2026-07-01T10:00:00Z",
        ],
    );

    let stressed = run_json(
        &dir,
        &[
            "wellness",
            "check",
            "--user",
            "lee",
            "--stress",
            "0.9",
            "--balance",
            "0.2",
            "--at",
            at,
        ],
    );
    let first_health = stressed["analysis"]["health_score"].as_f64().unwrap();

    let calm = run_json(&dir, &["wellness", "check", "--user", "lee", "--at", at]);
    let health = calm["analysis"]["health_score"].as_f64().unwrap();
    let sustainability = calm["metrics"]["sustainability_score"].as_f64().unwrap();
    assert!(first_health < health);
    // The earlier, lower score pulls the trailing mean down.
    let expected = 0.6 * health + 0.4 * first_health;
    assert!((sustainability - expected).abs() < 1e-9, "{sustainability} != {expected}");

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("users").join("lee.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored["health_scores"].as_array().unwrap().len(), 2);
}

#[test]
fn test_wellness_log_prunes_records_outside_window() {
    let dir = TempDir::new().unwrap();
    for at in ["2026-06-01T10:00:00Z", "2026-06-20T10:00:00Z", "2026-06-25T10:00:00Z"] {
        run_json(
            &dir,
            &["wellness", "log", "--user", "max", "--minutes", "30", "--at", at],
        );
    }

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("users").join("max.json")).unwrap(),
    )
    .unwrap();
    let usage = stored["usage"].as_array().unwrap();
    assert_eq!(usage.len(), 2);
    assert_eq!(usage[0]["timestamp"], "2026-06-20T10:00:00Z");
}

#[test]
fn test_habit_plan() {
    let dir = TempDir::new().unwrap();
    let plan = run_json(
        &dir,
        &["habit", "plan", "read more books", "--anchor", "finish dinner"],
    );
    let steps = plan["tiny_habits"].as_array().unwrap();
    assert!(!steps.is_empty());
    assert!(steps.iter().all(|s| s["difficulty"].as_u64().unwrap() <= 3));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "init"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("engine.toml"));

    let (_, _, code) = run_cli(&dir, &["config", "init"]);
    assert_ne!(code, 0);

    let config = run_json(&dir, &["config", "show"]);
    assert_eq!(config["reward"]["bonus_probability"], 0.12);
    assert_eq!(config["wellness"]["strictness"], "balanced");
}
