// E2E tests for the takeoutsort CLI commands
use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

mod common;
use common::{setup_bad_export, setup_trip_export};

#[test]
fn test_scan_command() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let export = setup_trip_export(&temp_dir);

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("scan")
        .arg(export.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Total files:\s+2\n").unwrap())
        .stdout(predicate::str::is_match(r"With JSON:\s+1\n").unwrap())
        .stdout(predicate::str::contains("Trip2023: 2 files (1 photos, 1 videos)"));
}

#[test]
fn test_scan_json_output() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let export = setup_trip_export(&temp_dir);

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    let output = cmd
        .arg("scan")
        .arg(export.path())
        .arg("--load-metadata")
        .arg("--output")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["total_files"], 2);
    assert_eq!(report["metadata"]["loaded"], 1);

    let media = report["media"].as_array().unwrap();
    let a = media
        .iter()
        .find(|m| m["path"].as_str().unwrap().ends_with("a.jpg"))
        .unwrap();
    assert_eq!(a["metadata"]["title"], "Beach");
    assert_eq!(a["tags"]["DateTimeOriginal"], "2023:06:15 14:30:00");
}

#[test]
fn test_scan_paths_output() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let export = setup_trip_export(&temp_dir);

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("scan")
        .arg(export.path())
        .arg("--output")
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.jpg"))
        .stdout(predicate::str::contains("b.mp4"))
        .stdout(predicate::str::contains("a.jpg.json").not());
}

#[test]
fn test_scan_bad_export() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let export = setup_bad_export(&temp_dir);

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("scan")
        .arg(export.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No photos directory found"))
        .stderr(predicate::str::contains("Drive, YouTube"));
}

#[test]
fn test_summary_command() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let export = setup_trip_export(&temp_dir);

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("summary")
        .arg(export.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Albums found (1):"))
        .stdout(predicate::str::contains("Trip2023"));
}

#[test]
fn test_inspect_command() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let sidecar = temp_dir.child("IMG_0001.jpg.json");
    sidecar
        .write_str(r#"{"description":"Pier","geoData":{"latitude":-33.5,"longitude":151.25,"altitude":3.0}}"#)
        .unwrap();

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("inspect")
        .arg(sidecar.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"GPSLatitudeRef\": \"S\""))
        .stdout(predicate::str::contains("\"Caption-Abstract\": \"Pier\""));
}

#[test]
fn test_inspect_malformed_sidecar() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let sidecar = temp_dir.child("broken.json");
    sidecar.write_str("{").unwrap();

    let mut cmd = Command::cargo_bin("takeoutsort").unwrap();
    cmd.arg("inspect")
        .arg(sidecar.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse sidecar"));
}
