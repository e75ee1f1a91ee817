#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const PLAN_YAML: &str = r#"
version: 1
work: Rule of Benedict
defaults:
  cue: Daily portion
  rb: ["RB 4"]
seasons:
  lent:
    weekdays:
      wed:
        cue: Lenten Wednesday
        rb: ["RB 49.1-3"]
    fallback:
      cue: Lenten weekday
      rb: ["RB 48.1-9"]
"#;

fn lti() -> Command {
    let mut cmd = Command::cargo_bin("lti").unwrap();
    cmd.env_remove("LTI_PLAN")
        .env_remove("LTI_TRADITION")
        .env_remove("RUST_LOG");
    cmd
}

fn write_plan(dir: &Path) -> PathBuf {
    let path = dir.join("plan.yaml");
    fs::write(&path, PLAN_YAML).unwrap();
    path
}

#[test]
fn validate_reports_valid_plan() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    lti()
        .arg("validate")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan valid."));
}

#[test]
fn validate_fails_on_bad_plan() {
    let dir = tempdir().unwrap();
    let plan = dir.path().join("bad.json");
    fs::write(&plan, r#"{"defaults": {"cue": "d", "rb": ["RB 0"]}}"#).unwrap();
    lti()
        .arg("validate")
        .arg(&plan)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn today_prints_resolved_entry() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    lti()
        .args(["today", "--date", "2025-03-05", "--plan"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-05 | Lent week 1 | Wednesday"))
        .stdout(predicate::str::contains("Cue: Lenten Wednesday"))
        .stdout(predicate::str::contains("- RB 49.1–3"));
}

#[test]
fn today_reads_plan_from_env() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    lti()
        .env("LTI_PLAN", &plan)
        .args(["today", "--date", "2025-03-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cue: Lenten weekday"));
}

#[test]
fn today_rejects_unknown_tradition() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    lti()
        .args(["today", "--date", "2025-03-05", "--tradition", "coptic", "--plan"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("coptic"));
}

#[test]
fn holidays_lists_movable_feasts() {
    lti()
        .args(["holidays", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ash Wednesday: 2025-03-05 (Lent, week 1, Wednesday)"))
        .stdout(predicate::str::contains(
            "Easter Sunday: 2025-04-20 (Eastertide, week 1, Sunday)",
        ))
        .stdout(predicate::str::contains("Pentecost: 2025-06-08"));
}

#[test]
fn build_writes_markdown() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    let out = dir.path().join("index.md");
    lti()
        .args(["build", "--year", "2025", "--plan"])
        .arg(&plan)
        .arg("--md")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("entries=365"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("| 2025-03-05 | Lent | 1 | Wednesday | Lenten Wednesday | RB 49.1–3 |"));
}

#[test]
fn build_with_scope_writes_csv() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    let out = dir.path().join("triduum.csv");
    lti()
        .args(["build", "--year", "2025", "--scope", "triduum", "--plan"])
        .arg(&plan)
        .arg("--csv")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("entries=3"));

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn build_refuses_existing_output() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    let out = dir.path().join("index.ics");
    fs::write(&out, "existing").unwrap();
    lti()
        .args(["build", "--year", "2025", "--plan"])
        .arg(&plan)
        .arg("--ics")
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("refusing to overwrite"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "existing");
}

#[test]
fn build_requires_exactly_one_output() {
    let dir = tempdir().unwrap();
    let plan = write_plan(dir.path());
    lti()
        .args(["build", "--year", "2025", "--plan"])
        .arg(&plan)
        .assert()
        .failure();
    lti()
        .args(["build", "--year", "2025", "--md", "a.md", "--csv", "b.csv", "--plan"])
        .arg(&plan)
        .assert()
        .failure();
}
