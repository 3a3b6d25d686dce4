//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the evaluate,
//! check, timeline and next subcommands through the actual binary, including
//! stdin piping, config files, flag overrides and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the day.json fixture.
fn day_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/day.json")
}

/// Helper: path to the clinic.toml fixture.
fn clinic_toml_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/clinic.toml")
}

fn day_json() -> String {
    std::fs::read_to_string(day_json_path()).expect("day.json fixture must exist")
}

fn slots() -> Command {
    Command::cargo_bin("slots").unwrap()
}

fn statuses(stdout: &[u8]) -> Vec<String> {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("stdout must be JSON");
    value
        .as_array()
        .expect("evaluate prints an array")
        .iter()
        .map(|s| s["status"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// evaluate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn evaluate_stdin_to_json() {
    let output = slots()
        .arg("evaluate")
        .write_stdin(day_json())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(
        statuses(&output),
        vec![
            "available",
            "booked",
            "available",
            "booked",
            "available",
            "available",
            "unavailable",
            "unavailable"
        ]
    );
}

#[test]
fn evaluate_table_format() {
    slots()
        .args(["evaluate", "-i", day_json_path(), "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("09:00-10:00  available\n"))
        .stdout(predicate::str::contains("10:00-11:00  booked"))
        .stdout(predicate::str::contains("16:00-17:00  unavailable"));
}

#[test]
fn evaluate_with_exclusion_frees_rescheduled_booking() {
    slots()
        .args(["evaluate", "-i", day_json_path(), "--exclude", "41", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00-11:00  available"));
}

#[test]
fn evaluate_confirmed_only_ignores_pending() {
    slots()
        .args(["evaluate", "-i", day_json_path(), "--confirmed-only", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12:00-13:00  available"));
}

#[test]
fn evaluate_with_config_file() {
    let output = slots()
        .args(["evaluate", "-i", day_json_path(), "--config", clinic_toml_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(
        statuses(&output),
        vec![
            "available",
            "available",
            "available",
            "booked",
            "booked",
            "booked",
            "available",
            "unavailable"
        ]
    );
}

#[test]
fn flags_override_config_file() {
    slots()
        .args([
            "evaluate",
            "-i",
            day_json_path(),
            "--config",
            clinic_toml_path(),
            "--duration",
            "30",
            "--format",
            "table",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("11:30-12:00  available"));
}

#[test]
fn evaluate_rejects_zero_duration() {
    slots()
        .args(["evaluate", "-i", day_json_path(), "--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration must be positive"));
}

#[test]
fn evaluate_rejects_oversized_granularity() {
    slots()
        .args(["evaluate", "-i", day_json_path(), "--granularity", "200000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot granularity 200000000000 min exceeds"));
}

#[test]
fn evaluate_rejects_malformed_day() {
    slots()
        .arg("evaluate")
        .write_stdin(r#"{"day":"16.03.2026"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed day"));
}

#[test]
fn evaluate_rejects_invalid_json() {
    slots()
        .arg("evaluate")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse snapshot JSON"));
}

#[test]
fn missing_input_file_reports_path() {
    slots()
        .args(["evaluate", "-i", "/nonexistent/day.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/day.json"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_conflicting_start_exits_two() {
    slots()
        .args(["check", "-i", day_json_path(), "--start", "10:30"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"overlap_minutes\": 30"));
}

#[test]
fn check_adjacent_start_is_clear() {
    slots()
        .args(["check", "-i", day_json_path(), "--start", "11:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn check_rejects_bad_start() {
    slots()
        .args(["check", "-i", day_json_path(), "--start", "lunch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --start"));
}

// ─────────────────────────────────────────────────────────────────────────────
// timeline / next
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn timeline_lists_blocks() {
    let output = slots()
        .args(["timeline", "-i", day_json_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["booked"].as_array().unwrap().len(), 2);
    assert_eq!(value["unavailable"].as_array().unwrap().len(), 1);
    assert_eq!(value["free"].as_array().unwrap().len(), 3);
}

#[test]
fn next_prints_first_available() {
    slots()
        .args(["next", "-i", day_json_path()])
        .assert()
        .success()
        .stdout("09:00-10:00\n");
}

#[test]
fn next_uses_config_workday() {
    slots()
        .args(["next", "-i", day_json_path(), "--config", clinic_toml_path()])
        .assert()
        .success()
        .stdout("08:00-09:00\n");
}

#[test]
fn next_prints_none_when_full() {
    slots()
        .args([
            "next",
            "-i",
            day_json_path(),
            "--workday-start",
            "15:00",
            "--workday-end",
            "17:00",
        ])
        .assert()
        .success()
        .stdout("none\n");
}

#[test]
fn no_subcommand_shows_usage() {
    slots()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
