//! Integration tests for the calorie binary.
//!
//! These tests verify end-to-end behavior including:
//! - Forced onboarding until a profile exists
//! - Profile calculation and persistence
//! - Food logging, ordering and deletion
//! - Daily summary output

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with an empty config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

/// Helper to get the CLI binary pointed at an isolated data dir and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("calorie"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn set_reference_profile(dir: &Path, goal: &str) {
    cli(dir)
        .args([
            "profile", "set", "--age", "30", "--gender", "male", "--height", "180", "--weight",
            "80", "--activity", "moderate", "--goal", goal,
        ])
        .assert()
        .success();
}

fn read_food_logs(dir: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(dir.join("data/foodLogs.json")).expect("Failed to read log");
    serde_json::from_str(&raw).expect("Log is not valid JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("calorie"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calorie tracking against a daily target"));
}

#[test]
fn test_default_command_shows_onboarding_without_profile() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome"))
        .stdout(predicate::str::contains("calorie profile set"));

    assert!(!temp_dir.path().join("data/userProfile.json").exists());
}

#[test]
fn test_profile_set_computes_target() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "profile", "set", "--age", "30", "--gender", "male", "--height", "180", "--weight",
            "80", "--activity", "moderate", "--goal", "maintain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile saved"))
        .stdout(predicate::str::contains("Target: 2759 kcal/day"));

    let raw = fs::read_to_string(temp_dir.path().join("data/userProfile.json")).unwrap();
    let profile: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(profile["targetCalories"].as_f64(), Some(2759.0));
    assert_eq!(profile["tdee"].as_f64(), Some(2759.0));
    assert_eq!(profile["activity"], "moderate");
}

#[test]
fn test_profile_replaced_on_edit() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");
    set_reference_profile(temp_dir.path(), "lose-normal");

    cli(temp_dir.path())
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily target 2259 kcal"))
        .stdout(predicate::str::contains("lose-normal"));
}

#[test]
fn test_invalid_gender_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "profile", "set", "--age", "30", "--gender", "robot", "--height", "180", "--weight",
            "80", "--activity", "moderate", "--goal", "maintain",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown gender"));

    assert!(!temp_dir.path().join("data/userProfile.json").exists());
}

#[test]
fn test_zero_age_rejected_and_profile_kept() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");

    cli(temp_dir.path())
        .args([
            "profile", "set", "--age", "0", "--gender", "female", "--height", "160", "--weight",
            "60", "--activity", "light", "--goal", "maintain",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age must be positive"));

    cli(temp_dir.path())
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily target 2759 kcal"));
}

#[test]
fn test_add_requires_profile() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["add", "--name", "Toast", "--calories", "120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome"));

    assert!(!temp_dir.path().join("data/foodLogs.json").exists());
}

#[test]
fn test_entries_logged_newest_first() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");

    cli(temp_dir.path())
        .args(["add", "--name", "Oatmeal", "--calories", "500", "--protein", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Oatmeal (500 kcal)"));

    cli(temp_dir.path())
        .args(["add", "--name", "Banana", "--calories", "300", "--carbs", "27"])
        .assert()
        .success();

    let logs = read_food_logs(temp_dir.path());
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["name"], "Banana");
    assert_eq!(logs[1]["name"], "Oatmeal");
    assert!(logs[0]["timestamp"].as_i64() >= logs[1]["timestamp"].as_i64());
    assert_ne!(logs[0]["id"], logs[1]["id"]);
}

#[test]
fn test_today_shows_summary() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");

    cli(temp_dir.path())
        .args(["add", "--name", "Oatmeal", "--calories", "500"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["add", "--name", "Banana", "--calories", "300"])
        .assert()
        .success();

    cli(temp_dir.path())
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily target 2759 kcal"))
        .stdout(predicate::str::contains("Oatmeal"))
        .stdout(predicate::str::contains("Banana"))
        .stdout(predicate::str::contains("Consumed:  800 kcal"))
        .stdout(predicate::str::contains("Remaining: 1959 kcal"));
}

#[test]
fn test_negative_calories_rejected() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");

    cli(temp_dir.path())
        .args(["add", "--name", "Mystery", "--calories=-50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("calories must be a non-negative number"));
}

#[test]
fn test_delete_entry_is_idempotent() {
    let temp_dir = setup_test_dir();
    set_reference_profile(temp_dir.path(), "maintain");

    cli(temp_dir.path())
        .args(["add", "--name", "Oatmeal", "--calories", "500"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["add", "--name", "Banana", "--calories", "300"])
        .assert()
        .success();

    let logs = read_food_logs(temp_dir.path());
    let banana_id = logs[0]["id"].as_str().unwrap().to_string();

    cli(temp_dir.path())
        .args(["delete", &banana_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry"));

    let logs = read_food_logs(temp_dir.path());
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["name"], "Oatmeal");

    cli(temp_dir.path())
        .args(["delete", &banana_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to delete"));

    assert_eq!(read_food_logs(temp_dir.path()).len(), 1);
}
