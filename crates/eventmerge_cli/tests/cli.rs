use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn eventmerge(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("eventmerge").unwrap();
    cmd.env_remove("EVENTMERGE_LOG_DIR")
        .env_remove("EVENTMERGE_LOG_LEVEL")
        .arg("--db")
        .arg(db);
    cmd
}

fn run_json(db: &Path, args: &[&str]) -> Value {
    let output = eventmerge(db).args(args).assert().success().get_output().clone();
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add_user(db: &Path, name: &str) -> String {
    run_json(db, &["user", "add", name])["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn add_event(db: &Path, title: &str, start: &str, end: &str, status: &str, user: &str) -> String {
    run_json(
        db,
        &[
            "event", "add", "--title", title, "--start", start, "--end", end, "--status", status,
            "--invitee", user,
        ],
    )["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn ping_prints_pong() {
    let dir = TempDir::new().unwrap();
    eventmerge(&dir.path().join("cli.db"))
        .arg("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("ping=pong"));
}

#[test]
fn merge_replaces_overlapping_events() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cli.db");
    let user = add_user(&db, "ann");
    let first = add_event(
        &db,
        "Event1Title",
        "2024-01-01T14:00:00Z",
        "2024-01-01T15:00:00Z",
        "TODO",
        &user,
    );
    add_event(
        &db,
        "Event2Title",
        "2024-01-01T14:45:00Z",
        "2024-01-01T16:00:00Z",
        "IN_PROGRESS",
        &user,
    );
    add_event(
        &db,
        "Event3Title",
        "2024-01-01T17:00:00Z",
        "2024-01-01T18:00:00Z",
        "TODO",
        &user,
    );

    let result = run_json(&db, &["merge", &user]);
    assert_eq!(result["operation"], "merge_completed");
    assert_eq!(result["summary"]["originalEventCount"], 3);
    assert_eq!(result["summary"]["remainingEventCount"], 2);
    assert_eq!(result["mergedEvents"][0]["title"], "Event1Title + Event2Title");
    assert_eq!(result["mergedEvents"][0]["originalEventIds"][0], first.as_str());

    eventmerge(&db)
        .args(["event", "show", &first])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: event not found"));

    let shown = run_json(&db, &["user", "show", &user]);
    assert_eq!(shown["events"].as_array().unwrap().len(), 2);
}

#[test]
fn overlaps_reports_without_mutating() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cli.db");
    let user = add_user(&db, "ann");
    add_event(&db, "A", "2024-01-01T10:00:00Z", "2024-01-01T11:00:00Z", "TODO", &user);
    add_event(&db, "B", "2024-01-01T10:30:00Z", "2024-01-01T11:30:00Z", "TODO", &user);

    let report = run_json(&db, &["overlaps"]);
    assert_eq!(report.as_array().unwrap().len(), 1);
    assert_eq!(report[0]["userName"], "ann");
    assert_eq!(report[0]["overlappingEventCount"], 2);

    let again = run_json(&db, &["overlaps"]);
    assert_eq!(again, report);
}

#[test]
fn merge_for_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    eventmerge(&dir.path().join("cli.db"))
        .args(["merge", "00000000-0000-4000-8000-000000000000"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("user not found"));
}

#[test]
fn event_add_rejects_inverted_range() {
    let dir = TempDir::new().unwrap();
    eventmerge(&dir.path().join("cli.db"))
        .args([
            "event",
            "add",
            "--title",
            "backwards",
            "--start",
            "2024-01-01T11:00:00Z",
            "--end",
            "2024-01-01T10:00:00Z",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn event_add_rejects_malformed_timestamp() {
    let dir = TempDir::new().unwrap();
    eventmerge(&dir.path().join("cli.db"))
        .args([
            "event",
            "add",
            "--title",
            "bad",
            "--start",
            "tomorrow",
            "--end",
            "2024-01-01T10:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

#[test]
fn user_list_returns_every_user_with_events() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cli.db");
    let ann = add_user(&db, "ann");
    add_user(&db, "bob");
    add_event(&db, "A", "2024-01-01T10:00:00Z", "2024-01-01T11:00:00Z", "TODO", &ann);

    let listed = run_json(&db, &["user", "list"]);
    let users = listed.as_array().unwrap();
    assert_eq!(users.len(), 2);

    let mut names: Vec<&str> = users
        .iter()
        .map(|entry| entry["user"]["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["ann", "bob"]);

    let ann_entry = users
        .iter()
        .find(|entry| entry["user"]["id"] == ann.as_str())
        .unwrap();
    assert_eq!(ann_entry["events"][0]["title"], "A");
}

#[test]
fn log_dir_without_level_uses_default_level() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");

    eventmerge(&dir.path().join("cli.db"))
        .arg("--log-dir")
        .arg(&log_dir)
        .arg("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("ping=pong"));
    assert!(log_dir.is_dir());
}

#[test]
fn explicit_log_level_is_accepted_from_env() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");

    eventmerge(&dir.path().join("cli.db"))
        .env("EVENTMERGE_LOG_DIR", &log_dir)
        .env("EVENTMERGE_LOG_LEVEL", "warn")
        .arg("ping")
        .assert()
        .success();
    assert!(log_dir.is_dir());
}

#[test]
fn unknown_log_level_fails() {
    let dir = TempDir::new().unwrap();

    eventmerge(&dir.path().join("cli.db"))
        .arg("--log-dir")
        .arg(dir.path().join("logs"))
        .args(["--log-level", "verbose", "ping"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported log level"));
}
