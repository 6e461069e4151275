//! CLI viewer integration tests
//!
//! Sessions are recorded through the store's recorder, then read back by
//! running the built `varscope` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use varscope_core::inspect::inspect;
use varscope_core::Config;
use varscope_store::{db, Recorder, Submission};

fn record_session(db_path: &Path, values: &[i64]) -> i64 {
    let recorder = Recorder::start(
        db::open_for_recording(db_path).unwrap(),
        &Config::default(),
    )
    .unwrap();
    for value in values {
        assert_eq!(
            recorder.submit("counter", inspect("counter", value, 5)),
            Submission::Accepted
        );
    }
    let session_id = recorder.session_id();
    recorder.drain().unwrap();
    session_id
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_varscope"))
        .current_dir(temp_dir.path())
        .env_remove("VARSCOPE_DB_PATH")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("vs.db")
}

#[test]
fn test_sessions_listed_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    let first = record_session(&db, &[1]);
    let second = record_session(&db, &[2]);

    let sessions = stdout_json(&run(&temp_dir, &["sessions", "--db", db.to_str().unwrap()]));

    let ids: Vec<i64> = sessions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert!(sessions[0]["hostname"].is_string());
    assert!(sessions[0]["path"].is_string());
}

#[test]
fn test_records_page_embeds_snapshot_json() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    let session = record_session(&db, &[10, 20, 30]);
    let session_arg = session.to_string();

    let page = stdout_json(&run(
        &temp_dir,
        &["records", &session_arg, "--limit", "2", "--db", db.to_str().unwrap()],
    ));
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["name"], "counter");
    assert_eq!(page[0]["data"]["metatype"], "int");
    assert_eq!(page[0]["data"]["value"], 10);

    let last_id = page[1]["id"].as_i64().unwrap().to_string();
    let rest = stdout_json(&run(
        &temp_dir,
        &["records", &session_arg, "--after", &last_id, "--db", db.to_str().unwrap()],
    ));
    let rest = rest.as_array().unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["data"]["value"], 30);
}

#[test]
fn test_unknown_session_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    record_session(&db, &[1]);

    let output = run(&temp_dir, &["records", "999", "--db", db.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_NOT_FOUND"), "stderr was: {}", stderr);
}

#[test]
fn test_missing_database_fails_without_creating_it() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&temp_dir, &["sessions", "--db", db.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!db.exists());
}

#[test]
fn test_default_database_comes_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    let session = record_session(&db, &[5]);

    let output = Command::new(env!("CARGO_BIN_EXE_varscope"))
        .current_dir(temp_dir.path())
        .env("VARSCOPE_DB_PATH", &db)
        .args(["sessions"])
        .output()
        .expect("Failed to execute CLI");

    let sessions = stdout_json(&output);
    assert_eq!(sessions[0]["id"].as_i64(), Some(session));
}

#[test]
fn test_uninitialized_database_is_not_migrated() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    rusqlite::Connection::open(&db).unwrap();

    let output = run(&temp_dir, &["sessions", "--db", db.to_str().unwrap()]);

    assert!(!output.status.success());
    let conn = rusqlite::Connection::open(&db).unwrap();
    let tables: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn test_viewer_reads_while_recorder_is_running() {
    let temp_dir = TempDir::new().unwrap();
    let db_file = db_path(&temp_dir);
    let recorder = Recorder::start(db::open_for_recording(&db_file).unwrap(), &Config::default())
        .unwrap();
    recorder.submit("counter", inspect("counter", &1i64, 5));

    let sessions = stdout_json(&run(&temp_dir, &["sessions", "--db", db_file.to_str().unwrap()]));
    assert_eq!(sessions[0]["id"].as_i64(), Some(recorder.session_id()));

    let stats = recorder.drain().unwrap();
    assert_eq!(stats.written, 1);
}
