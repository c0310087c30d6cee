//! End-to-end CLI tests for chatvault.
//!
//! These tests run the actual binary and check its output.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let role = r#"{"id": "9", "name": "mods", "color": 3447003, "hoist": true, "position": 2, "permissions": "8"}"#;
    fs::write(dir.path().join("role.json"), role).unwrap();

    let channel = r#"{"id": "20", "type": 0, "name": "general", "topic": null, "position": 1, "nsfw": false, "parent_id": "19"}"#;
    fs::write(dir.path().join("channel.json"), channel).unwrap();

    let thread = r#"{"id": "30", "type": 11, "name": "a thread"}"#;
    fs::write(dir.path().join("thread.json"), thread).unwrap();

    let message = r#"{"id": "100", "author": {"id": "7"}, "content": "Hello; \"quoted\"\nnext line", "tts": false}"#;
    fs::write(dir.path().join("message.json"), message).unwrap();

    dir
}

fn chatvault() -> Command {
    Command::cargo_bin("chatvault").unwrap()
}

// ============================================================================
// row
// ============================================================================

#[test]
fn test_row_role() {
    let dir = setup_fixtures();

    chatvault()
        .arg("row")
        .arg("role")
        .arg(dir.path().join("role.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\trest\tcreate\trole\t9\tmods\t3447003\t2\t8\thoist\n",
        ));
}

#[test]
fn test_row_tags_and_delimiter() {
    let dir = setup_fixtures();

    chatvault()
        .args(["row", "--fetch-type", "gateway", "--op", "update", "-d", "comma", "channel"])
        .arg(dir.path().join("channel.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ",gateway,update,channel,20,text,1,general,,,19\n",
        ));
}

#[test]
fn test_row_from_stdin() {
    chatvault()
        .args(["row", "emoji"])
        .write_stdin(r#"{"id": "42", "name": "blob", "require_colons": false}"#)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("\temoji\t42\tblob\tnocolons\n"));
}

#[test]
fn test_row_output_appends() {
    let dir = setup_fixtures();
    let log = dir.path().join("events.tsv");

    for _ in 0..2 {
        chatvault()
            .arg("row")
            .arg("-o")
            .arg(&log)
            .arg("message")
            .arg(dir.path().join("message.json"))
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    let content = fs::read_to_string(&log).unwrap();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][3], "message");
    assert_eq!(&records[0][8], "Hello; \"quoted\"\nnext line");
}

#[test]
fn test_row_unknown_shape_fails() {
    let dir = setup_fixtures();

    chatvault()
        .arg("row")
        .arg("webhook")
        .arg(dir.path().join("role.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("webhook"));
}

#[test]
fn test_row_unrecognized_channel_kind_fails() {
    let dir = setup_fixtures();

    chatvault()
        .arg("row")
        .arg("channel")
        .arg(dir.path().join("thread.json"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("11"));
}

#[test]
fn test_row_missing_input_fails() {
    chatvault()
        .args(["row", "role", "does-not-exist.json"])
        .assert()
        .failure();
}

// ============================================================================
// fetch
// ============================================================================

#[test]
fn test_fetch_then_present() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/attachments/1/2/cat.png");
        then.status(200).body("meow");
    });
    let dir = tempdir().unwrap();
    let locator = server.url("/attachments/1/2/cat.png");

    chatvault()
        .arg("fetch")
        .arg("--root")
        .arg(dir.path())
        .arg(&locator)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fetched\t").and(predicate::str::ends_with("\t4\n")));

    chatvault()
        .arg("fetch")
        .arg("--root")
        .arg(dir.path())
        .arg(&locator)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("present\t"));

    mock.assert();
    assert_eq!(
        fs::read(dir.path().join("attachments/1/2/cat.png")).unwrap(),
        b"meow"
    );
}

#[test]
fn test_fetch_reports_failures_and_continues() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ok.png");
        then.status(200).body("ok");
    });
    server.mock(|when, then| {
        when.method(GET).path("/missing.png");
        then.status(404);
    });
    let dir = tempdir().unwrap();

    chatvault()
        .arg("fetch")
        .arg("--root")
        .arg(dir.path())
        .arg(server.url("/missing.png"))
        .arg(server.url("/ok.png"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("fetched\t"))
        .stderr(predicate::str::contains("failed\t").and(predicate::str::contains("404")));

    assert!(dir.path().join("ok.png").exists());
    assert!(!dir.path().join("missing.png").exists());
}

#[test]
fn test_fetch_requires_locator() {
    chatvault().arg("fetch").assert().failure();
}

#[test]
fn test_help() {
    chatvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch").and(predicate::str::contains("row")));
}
