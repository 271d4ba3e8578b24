#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("roulement-cli").unwrap()
}

#[test]
fn generate_then_check_and_show() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    let grid = dir.path().join("grid.csv");
    let requests = dir.path().join("requests.txt");
    fs::write(&requests, "S5 2025-12-24 A3 Day\nbogus line\n").unwrap();

    cli()
        .args(["generate", "--month", "2025-12", "--staff", "40", "--stations", "3"])
        .args(["--start-staff", "S1", "--single-shift", "A1", "--quiet"])
        .arg("--requests")
        .arg(&requests)
        .arg("--out-grid-csv")
        .arg(&grid)
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("Roster 2025-12 generated (31 days"))
        .stderr(predicate::str::contains("warning: line 2"));

    assert!(roster.exists());
    let csv = fs::read_to_string(&grid).unwrap();
    assert!(csv.starts_with("date,A1 Day(1),A1 Day(2),A2 Day(1)"));
    assert!(csv.contains("S5*"));

    cli()
        .arg("check")
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    cli()
        .arg("show")
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("== Staff totals =="));
}

#[test]
fn check_reports_unfilled_slots() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    let report = dir.path().join("conflicts.csv");

    cli()
        .args(["generate", "--month", "2026-02", "--staff", "3", "--stations", "1"])
        .args(["--start-staff", "S2", "--single-shift", "", "--quiet"])
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success();

    cli()
        .arg("check")
        .arg("--report")
        .arg(&report)
        .arg("--roster")
        .arg(&roster)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("conflict(s)"));

    let csv = fs::read_to_string(&report).unwrap();
    assert!(csv.starts_with("date,slot,staff,kind\n"));
    assert!(csv.contains("unfilled"));
}

#[test]
fn zero_staff_is_rejected() {
    let dir = tempdir().unwrap();
    cli()
        .args(["generate", "--month", "2025-12", "--staff", "0"])
        .arg("--roster")
        .arg(dir.path().join("roster.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("staff count must be greater than zero"));
    assert!(!dir.path().join("roster.json").exists());
}

#[test]
fn holidays_lists_blocks_with_lieu_days() {
    let dir = tempdir().unwrap();
    let holidays = dir.path().join("holidays.csv");
    fs::write(&holidays, "date,name\n2025-12-25,Christmas\n2025-12-26,Boxing day\n").unwrap();

    cli()
        .args(["holidays", "--month", "2025-12"])
        .arg("--holidays")
        .arg(&holidays)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2025-12-25, 2025-12-26, 2025-12-27, 2025-12-28 | lieu 2025-12-29 (days 1-2) / 2025-12-30 (days 3+)",
        ));
}
