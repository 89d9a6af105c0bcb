//! Command-line behavior of the `zipbrute` binary.

#![cfg(feature = "cli")]

mod common;

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use common::fixture;
use zipbrute::search::NegativeCache;

fn zipbrute(args: &[&str], db: &tempfile::TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zipbrute"))
        .args(args)
        .arg("--db")
        .arg(db.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Start the binary and return it with the first line it printed.
fn spawn_zipbrute(args: &[&str], db: &tempfile::TempDir) -> (Child, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_zipbrute"))
        .args(args)
        .arg("--db")
        .arg(db.path())
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let mut first_line = String::new();
    BufReader::new(child.stdout.as_mut().unwrap())
        .read_line(&mut first_line)
        .unwrap();
    (child, first_line)
}

#[test]
fn prints_password_once() {
    let db = tempfile::tempdir().unwrap();
    let archive = fixture("ab_two_members.zip");
    let out = zipbrute(
        &["--input", archive.to_str().unwrap(), "--length", "2", "--worker", "2"],
        &db,
    );

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Have 0 elements\n"));
    assert_eq!(stdout.matches("Password: ").count(), 1);
    assert!(stdout.contains("Password: AB\n"));
}

#[test]
fn rerun_reports_cache_population() {
    let db = tempfile::tempdir().unwrap();
    let archive = fixture("ab_two_members.zip");
    let args = ["--input", archive.to_str().unwrap(), "--length", "1"];

    let first = zipbrute(&args, &db);
    assert!(first.status.success());
    assert!(!String::from_utf8_lossy(&first.stdout).contains("Password:"));

    let second = zipbrute(&args, &db);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("Have 26 elements"));
}

#[test]
fn empty_input_is_a_config_error() {
    let db = tempfile::tempdir().unwrap();
    let out = zipbrute(&["--input", ""], &db);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input file is empty"));
}

#[test]
fn negative_length_is_a_config_error() {
    let db = tempfile::tempdir().unwrap();
    let archive = fixture("ab_two_members.zip");
    let out = zipbrute(&["--input", archive.to_str().unwrap(), "--length", "-1"], &db);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_archive_exits_nonzero() {
    let db = tempfile::tempdir().unwrap();
    let missing = db.path().join("nope.zip");
    let out = zipbrute(&["--input", missing.to_str().unwrap()], &db);
    assert_eq!(out.status.code(), Some(1));
    assert!(!db.path().join("candidates.redb").exists());
}

#[test]
fn killed_run_keeps_recorded_failures() {
    let db = tempfile::tempdir().unwrap();
    let archive = fixture("ab_two_members.zip");
    let args = ["--input", archive.to_str().unwrap(), "--length", "3", "--worker", "1"];

    // Kill mid-run, waiting longer each time until something was recorded.
    let mut wait = Duration::from_millis(200);
    let recorded = loop {
        let (mut child, first_line) = spawn_zipbrute(&args, &db);
        assert!(first_line.starts_with("Have "));
        thread::sleep(wait);
        child.kill().unwrap();
        child.wait().unwrap();

        let recorded = NegativeCache::open(db.path()).unwrap().len().unwrap();
        if recorded > 0 {
            break recorded;
        }
        assert!(wait < Duration::from_secs(10), "no failure recorded before kill");
        wait *= 2;
    };

    let (mut child, first_line) = spawn_zipbrute(&args, &db);
    child.kill().unwrap();
    child.wait().unwrap();
    assert_eq!(first_line, format!("Have {recorded} elements\n"));
}
