//! Integration tests for the beleg CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn beleg(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("beleg").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn list_with_empty_inbox_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();

    beleg(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No PDF files found"));

    assert!(dir.path().join("new").is_dir());
}

#[test]
fn process_with_empty_inbox_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();

    beleg(dir.path())
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("No PDF files found"));
}

#[test]
fn report_without_ledger_points_to_process() {
    let dir = tempfile::tempdir().unwrap();

    beleg(dir.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No ledger found"));
}

#[test]
fn config_show_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();

    beleg(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_vat_rate"))
        .stdout(predicate::str::contains("tax_records.xlsx"));
}

#[test]
fn config_init_creates_file() {
    let dir = tempfile::tempdir().unwrap();

    beleg(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("beleg.json").exists());

    // A second init without --force refuses
    beleg(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn unreadable_pdf_is_recorded_and_archived_for_review() {
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("new");
    std::fs::create_dir_all(&inbox).unwrap();
    std::fs::write(inbox.join("kaputt.pdf"), b"this is no pdf").unwrap();

    beleg(dir.path())
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs attention"))
        .stdout(predicate::str::contains("kaputt.pdf"));

    // The document left the inbox and landed in the unknown-vendor bucket
    assert!(!inbox.join("kaputt.pdf").exists());
    assert!(dir
        .path()
        .join("archive")
        .join("unknown_vendor")
        .join("kaputt.pdf")
        .exists());
    assert!(dir.path().join("tax_records.xlsx").exists());

    // The record shows up in the report and is not processed twice
    beleg(dir.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total invoices: 1"))
        .stdout(predicate::str::contains("MANUAL_REVIEW_NEEDED"));

    beleg(dir.path())
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("No PDF files found"));
}
