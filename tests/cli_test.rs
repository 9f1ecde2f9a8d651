//! Binary startup tests
//!
//! Startup problems must end the process with a non-zero status before any
//! watching begins.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const CONFIG_KEYS: [&str; 10] = [
    "S3_BUCKET",
    "S3_HOST",
    "AWS_REGION",
    "AWS_PROFILE",
    "AWS_CONFIG_FILE",
    "SCREENSHOT_LOCATION",
    "S3_ENDPOINT",
    "UPLOAD_TIMEOUT_SECS",
    "UPLOAD_ON_MODIFY",
    "NOTIFICATION_TITLE",
];

fn uploader() -> Command {
    let mut cmd = Command::cargo_bin("screenshot-uploader").unwrap();
    for key in CONFIG_KEYS {
        cmd.env_remove(key);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    uploader()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_file_fails() {
    uploader()
        .args(["--config", "/nonexistent/.screenshot-uploader"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_incomplete_config_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "S3_BUCKET=shots").unwrap();

    uploader()
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("AWS_REGION"));
}

#[test]
fn test_unwatchable_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("uploader.env");
    std::fs::write(
        &config_path,
        format!(
            "S3_BUCKET=shots\nAWS_REGION=us-east-1\nSCREENSHOT_LOCATION={}\n",
            dir.path().join("missing").display()
        ),
    )
    .unwrap();

    uploader()
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to start watching"));
}

#[test]
fn test_invalid_log_level_fails() {
    uploader()
        .args(["--log-level", "loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level"));
}
