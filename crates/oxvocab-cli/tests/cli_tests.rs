//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn oxvocab(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("oxvocab").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GROQ_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    oxvocab(dir.path()).arg("init").assert().success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    oxvocab(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created oxvocab.toml"))
        .stdout(predicate::str::contains("Created data/oxford_5000.csv"));

    assert!(dir.path().join("oxvocab.toml").exists());
    assert!(dir.path().join("data/oxford_5000.csv").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    oxvocab(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn stats_after_init() {
    let dir = initialized();

    oxvocab(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("High Scores"))
        .stdout(predicate::str::contains("Learning Progress"))
        .stdout(predicate::str::contains("No difficult words yet."));
}

#[test]
fn stats_rejects_unknown_level() {
    let dir = initialized();

    oxvocab(dir.path())
        .args(["stats", "--level", "z9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown CEFR level"));
}

#[test]
fn export_writes_json() {
    let dir = initialized();
    let out = dir.path().join("stats.json");

    oxvocab(dir.path())
        .arg("export")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Statistics exported to"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["word_statistics"]["total_words"], 12);
    assert_eq!(json["game_scores"]["overall"], 0);
}

#[test]
fn reset_with_yes_writes_default_scores() {
    let dir = initialized();

    oxvocab(dir.path())
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset ALL progress"));

    assert!(dir.path().join("scores/top_score.json").exists());
}

#[test]
fn reset_unknown_word_fails() {
    let dir = initialized();

    oxvocab(dir.path())
        .args(["reset", "--word", "serendipity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in the vocabulary"));
}

#[test]
fn reset_without_confirmation_is_cancelled() {
    let dir = initialized();

    oxvocab(dir.path())
        .arg("reset")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset cancelled."));
}

#[test]
fn check_reports_missing_key() {
    let dir = initialized();

    oxvocab(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ok] vocabulary: 12 words"))
        .stdout(predicate::str::contains("has no API key"))
        .stderr(predicate::str::contains("environment check found 1 issue(s)"));
}

#[test]
fn check_reports_missing_data_file() {
    let dir = TempDir::new().unwrap();

    oxvocab(dir.path())
        .arg("check")
        .env("GROQ_API_KEY", "test-key")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ok] provider 'groq' is configured"))
        .stderr(predicate::str::contains("environment check found 1 issue(s)"));
}

#[test]
fn play_requires_api_key() {
    let dir = initialized();

    oxvocab(dir.path())
        .args(["play", "--level", "a1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    oxvocab(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adaptive English vocabulary quiz"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    oxvocab(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oxvocab"));
}
