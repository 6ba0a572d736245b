//! End-to-end tests for the demo binary

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_demo_runs_both_cases_in_order() {
    assert_cmd::cargo::cargo_bin_cmd!("scriptest-demo")
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running: Expectations\n---------------------"))
        .stdout(predicate::str::contains("Running: Completions\n--------------------"))
        .stdout(predicate::str::is_match("(?s)Running: Expectations.*Running: Completions").unwrap());
}

#[test]
fn test_demo_reports_context_and_failures() {
    assert_cmd::cargo::cargo_bin_cmd!("scriptest-demo")
        .args(["--no-color", "--plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS _test2"))
        .stdout(predicate::str::contains("FAIL _test3 — 1 != 2"))
        .stdout(predicate::str::contains(
            "Completions FAIL _missed_deadline — waiting for server: Timed out waiting for: reply that never comes",
        ))
        .stdout(predicate::str::contains("PASS _background_callback — callback observed"));
}

#[test]
fn test_demo_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scriptest.toml");
    fs::write(
        &path,
        "pass_marker = \"ok\"\nfail_marker = \"not ok\"\ncolor = false\n",
    )
    .unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("scriptest-demo")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok _test1"))
        .stdout(predicate::str::contains("not ok _test3"));
}

#[test]
fn test_demo_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scriptest.toml");
    fs::write(&path, "pass_marker = \"\"\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("scriptest-demo")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass_marker"));
}
