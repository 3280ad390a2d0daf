#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quiverstats(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quiverstats").expect("binary should exist");
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_version_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiverstats"));
}

#[test]
fn cli_help_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("practice"))
        .stdout(predicate::str::contains("rings"));
}

#[test]
fn score_requires_coordinates() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("score")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn centre_of_the_face_scores_ten() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .args(["--root"])
        .arg(home.path())
        .args(["score", "61", "61", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 10"));
}

#[test]
fn point_on_the_right_axis_scores_three() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--root")
        .arg(home.path())
        .args(["score", "109.8", "61"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3 of 10"));
}

#[test]
fn non_square_surface_is_mapped_per_axis() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--root")
        .arg(home.path())
        .args([
            "score", "122", "61", "--width", "244", "--height", "122", "--format", "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"x\": 61.0"))
        .stdout(predicate::str::contains("\"score\": 10"));
}

#[test]
fn zero_width_surface_is_a_runtime_failure() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--root")
        .arg(home.path())
        .args(["score", "10", "10", "--width", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid target geometry"));
}

#[test]
fn rings_lists_every_band_from_outermost() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--root")
        .arg(home.path())
        .arg("rings")
        .assert()
        .success()
        .stdout(predicate::str::contains("| 1 | 61.000 | 0 | #FFFFFF |"))
        .stdout(predicate::str::contains("| 10 | 6.100 | 4 | #FFFF00 |"));
}

#[test]
fn missing_root_exits_with_code_3() {
    let home = TempDir::new().expect("temp dir should be created");
    quiverstats(&home)
        .arg("--root")
        .arg(home.path().join("absent"))
        .arg("rings")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}
