use std::{fs, process::Command};

use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_observe");

#[test]
fn missing_source_exits_non_zero_without_creating_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("03-partial-solutions");
    let status = Command::new(BIN)
        .arg("--source")
        .arg(dir.path().join("02-solutions"))
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!status.status.success());
    assert!(String::from_utf8_lossy(&status.stderr).contains("solutions directory not found"));
    assert!(!output.exists());
}

#[test]
fn source_without_plan_files_exits_non_zero() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("02-solutions");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("readme.md"), "(not a plan)").unwrap();
    let status = Command::new(BIN)
        .arg("--source")
        .arg(&source)
        .arg("--output")
        .arg(dir.path().join("out"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn skipped_files_still_exit_zero() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("02-solutions");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "; only a comment\n").unwrap();
    fs::write(source.join("b.txt"), "(pick a)(place a)").unwrap();
    let output = dir.path().join("out");
    let result = Command::new(BIN)
        .arg("--source")
        .arg(&source)
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Warning: a.txt has no actions, skipping..."));
    assert!(stdout.contains("Done! Generated 2 partial observation files. (1 skipped)"));
    assert!(!output.join("a.txt").exists());
    assert!(output.join("b.txt").exists());
}
