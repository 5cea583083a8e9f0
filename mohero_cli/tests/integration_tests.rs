//! Integration tests for the mohero binary.
//!
//! These tests verify end-to-end behavior including:
//! - Program selection and enrollment persistence
//! - Daily ritual display and rep logging
//! - Day completion and the journal/CSV export path

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("mohero"))
}

fn run(data_dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    cli()
        .args(args)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mohero ritual program tracker"));
}

#[test]
fn test_programs_lists_catalog() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["programs"])
        .success()
        .stdout(predicate::str::contains("Marée du Crocodile"))
        .stdout(predicate::str::contains("Souffle du Jaguar"))
        .stdout(predicate::str::contains("Mohero Origin"))
        .stdout(predicate::str::contains("crocodile-tide"));
}

#[test]
fn test_select_unknown_program_fails() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "shark-week"]).failure();
}

#[test]
fn test_select_enrolls_and_persists() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"])
        .success()
        .stdout(predicate::str::contains("Marée du Crocodile selected"))
        .stdout(predicate::str::contains("Day 1 of 7"));

    // Enrollment lands in state.json
    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("state.json")).unwrap())
            .unwrap();
    assert_eq!(state["current_program_id"], "crocodile-tide");
    assert_eq!(state["enrollments"][0]["current_day"], 1);
}

#[test]
fn test_today_without_program() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("No active program"));
}

#[test]
fn test_today_shows_ritual() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("Day 1 of 7"))
        .stdout(predicate::str::contains("Le voyage commence"))
        .stdout(predicate::str::contains("0/100"))
        .stdout(predicate::str::contains("Ritual 0% complete"));
}

#[test]
fn test_log_accumulates_and_saturates() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();

    run(temp_dir.path(), &["log", "squats", "40"])
        .success()
        .stdout(predicate::str::contains("40/100"));

    // 40 + 150 saturates at the target of 100
    run(temp_dir.path(), &["log", "squats", "150"])
        .success()
        .stdout(predicate::str::contains("100/100"));

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("100/100"));
}

#[test]
fn test_log_stale_exercise_is_reported_not_fatal() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();

    // Day 1 has no lunges
    run(temp_dir.path(), &["log", "lunges", "10"])
        .success()
        .stdout(predicate::str::contains("not part of today's ritual"));
}

#[test]
fn test_complete_advances_day() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();

    run(temp_dir.path(), &["complete"])
        .success()
        .stdout(predicate::str::contains("Day 1 complete"));

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("Day 2 of 7"));
}

#[test]
fn test_full_program_walk() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();

    for _ in 0..6 {
        run(temp_dir.path(), &["complete"]).success();
    }

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("Day 7 of 7"));

    run(temp_dir.path(), &["complete"])
        .success()
        .stdout(predicate::str::contains("Program complete"));

    run(temp_dir.path(), &["today"])
        .success()
        .stdout(predicate::str::contains("Program complete"));

    run(temp_dir.path(), &["status"])
        .success()
        .stdout(predicate::str::contains("Marée du Crocodile — completed"))
        .stdout(predicate::str::contains("Total days completed: 7"));

    // A further complete is a no-op
    run(temp_dir.path(), &["complete"])
        .success()
        .stdout(predicate::str::contains("Nothing to complete"));
}

#[test]
fn test_reselect_resumes() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();
    run(temp_dir.path(), &["complete"]).success();
    run(temp_dir.path(), &["complete"]).success();

    // Re-selecting does not reset progress
    run(temp_dir.path(), &["select", "crocodile-tide"])
        .success()
        .stdout(predicate::str::contains("Day 3 of 7"));
}

#[test]
fn test_clan_listing_and_join() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["clan"])
        .success()
        .stdout(predicate::str::contains("CLAN ONOTKA"))
        .stdout(predicate::str::contains("CLAN EKLOA"));

    run(temp_dir.path(), &["clan", "okwaho"])
        .success()
        .stdout(predicate::str::contains("Welcome to CLAN OKWÁHO"));

    run(temp_dir.path(), &["status"])
        .success()
        .stdout(predicate::str::contains("Clan: CLAN OKWÁHO"));
}

#[test]
fn test_unknown_clan_fails() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["clan", "wolfpack"])
        .failure()
        .stderr(predicate::str::contains("Unknown clan"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();
    for _ in 0..3 {
        run(temp_dir.path(), &["complete"]).success();
    }

    run(temp_dir.path(), &["export"])
        .success()
        .stdout(predicate::str::contains("Exported 3 completed days"));

    let csv_path = temp_dir.path().join("history.csv");
    assert!(csv_path.exists());
    let csv_content = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_content.contains("id,program_id,day"));
    assert!(csv_content.contains("crocodile-tide"));
}

#[test]
fn test_export_with_cleanup() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["select", "crocodile-tide"]).success();
    run(temp_dir.path(), &["complete"]).success();

    run(temp_dir.path(), &["export", "--cleanup"])
        .success()
        .stdout(predicate::str::contains("Cleaned up 1 processed journal"));

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join("journal"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".processed"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_empty_export() {
    let temp_dir = setup_test_dir();

    run(temp_dir.path(), &["export"])
        .success()
        .stdout(predicate::str::contains("nothing to export"));
}
