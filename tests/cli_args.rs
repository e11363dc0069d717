//! Integration tests for CLI argument handling.
//! Exercises the binary's flag parsing and validation without entering the
//! TUI event loop.

use std::process::Command;

/// Helper to run the CLI with given args and capture output.
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pulse"))
        .args(args)
        .output()
        .expect("Failed to execute pulse")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pulse"), "Help should mention pulse");
    assert!(stdout.contains("api-url"), "Help should mention --api-url");
    assert!(stdout.contains("days"), "Help should mention --days");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
}

#[test]
fn test_invalid_date_prints_error_and_exits() {
    let output = run_cli(&["--date", "not-a-date"]);
    assert!(!output.status.success(), "Expected invalid date to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid date"),
        "Should print error message about the invalid date: {}",
        stderr
    );
}

#[test]
fn test_zero_days_rejected() {
    let output = run_cli(&["--days", "0"]);
    assert!(!output.status.success(), "Expected --days 0 to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid day count"),
        "Should print error message about the day count: {}",
        stderr
    );
}

#[test]
fn test_unknown_flag_rejected() {
    let output = run_cli(&["--frobnicate"]);
    assert!(!output.status.success());
}
