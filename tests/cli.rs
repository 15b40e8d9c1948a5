/*!
 * Integration tests for the command-line binary
 */

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn extractor() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("codebase-extractor"))
}

#[test]
fn extracts_tree_and_content() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("extract.txt");

    write_file(&root.path().join("a.py"), "print('a')\n");
    write_file(&root.path().join("lib/c.py"), "print('c')\n");
    write_file(&root.path().join("node_modules/pkg/index.js"), "x\n");

    extractor()
        .arg("--root")
        .arg(root.path())
        .arg("--output")
        .arg(&output)
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXTRACTION COMPLETE"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("Total Tokens: "));
    assert!(text.contains("Directory Structure:\n\n├── a.py\n└── lib\n    └── c.py\n"));
    assert!(text.contains("All Files (Structure Only):\n\n- a.py\n- lib/c.py\n"));
    assert!(!text.contains("node_modules"));
}

#[test]
fn include_flag_accepts_space_separated_patterns() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("extract.txt");

    write_file(&root.path().join("a.py"), "print('a')\n");
    write_file(&root.path().join("lib/c.py"), "print('c')\n");
    write_file(&root.path().join("docs/guide.md"), "# Guide\n");

    extractor()
        .arg("-r")
        .arg(root.path())
        .arg("-o")
        .arg(&output)
        .arg("-i")
        .arg("lib docs")
        .arg("--no-progress")
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Inclusion patterns: lib/, docs/"));
    assert!(text.contains("Files With Content Included:\n\n- docs/guide.md\n- lib/c.py\n"));
    assert!(!text.contains("print('a')"));
}

#[test]
fn existing_output_requires_confirmation() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("extract.txt");

    write_file(&root.path().join("a.py"), "print('a')\n");
    write_file(&output, "keep me");

    extractor()
        .arg("-r")
        .arg(root.path())
        .arg("-o")
        .arg(&output)
        .arg("--no-progress")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

    extractor()
        .arg("-r")
        .arg(root.path())
        .arg("-o")
        .arg(&output)
        .arg("--no-progress")
        .arg("--force")
        .assert()
        .success();
    assert!(fs::read_to_string(&output).unwrap().contains("print('a')"));
}

#[test]
fn missing_root_fails() {
    let out = tempdir().unwrap();

    extractor()
        .arg("-r")
        .arg(out.path().join("missing"))
        .arg("-o")
        .arg(out.path().join("extract.txt"))
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Root directory not found"));
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_output_fails_before_scanning() {
    let root = tempdir().unwrap();
    write_file(&root.path().join("a.py"), "print('a')\n");

    extractor()
        .arg("-r")
        .arg(root.path())
        .arg("-o")
        .arg("/proc/codebase_extract.txt")
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output path not writable"))
        .stdout(predicate::str::contains("EXTRACTION COMPLETE").not());
}

#[test]
fn generates_completions() {
    extractor()
        .arg("--generate")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("codebase-extractor"));
}
