//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn manchego() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("manchego"))
}

fn sample_source() -> TempDir {
    let tmp = TempDir::new().expect("temp source");
    for (rel, body) in [("a/x.md", "% Ex\nx body\n"), ("a/y.md", "y body\n"), ("b/z.md", "% Zed\nz body\n")] {
        let path = tmp.path().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write doc");
    }
    fs::create_dir_all(tmp.path().join("empty/nested")).expect("mkdir empty");
    tmp
}

#[cfg(unix)]
fn fake_converter(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    // Invoked as: <program> --from F --to T FILE
    let script = dir.join("fake-pandoc");
    fs::write(&script, "#!/bin/sh\ncat \"$5\"\n").expect("write script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
    script
}

#[test]
fn test_cli_version() {
    manchego().arg("--version").assert().success().stdout(predicate::str::contains("manchego"));
}

#[test]
fn test_cli_help() {
    manchego()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a tree of documents"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_build_requires_source() {
    manchego().arg("build").assert().failure().stderr(predicate::str::contains("SOURCE"));
}

#[test]
fn test_build_rejects_missing_source() {
    let tmp = TempDir::new().expect("tmp");
    manchego()
        .args(["build", tmp.path().join("nope").to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn test_build_rejects_unknown_format() {
    let src = sample_source();
    let out = TempDir::new().expect("out");
    manchego()
        .args(["build", src.path().to_str().expect("utf8 path"), "--to", "docx", "--output-dir"])
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration failed"))
        .stderr(predicate::str::contains("Unknown target format 'docx'"));
}

#[test]
fn test_build_rejects_missing_template() {
    let src = sample_source();
    manchego()
        .args(["build", src.path().to_str().expect("utf8 path"), "--toc-template", "missing.j2", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOC template not found: 'missing.j2'"));
}

#[test]
fn test_build_reports_converter_failure() {
    let src = sample_source();
    let out = TempDir::new().expect("out");
    manchego()
        .args(["build", src.path().to_str().expect("utf8 path"), "--converter", "/nonexistent/pandoc", "-o"])
        .arg(out.path().join("site"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("document tree construction failed"))
        .stderr(predicate::str::contains("x.md"));
    assert!(!out.path().join("site").exists());
}

#[test]
fn test_info_prints_pruned_tree() {
    let src = sample_source();
    manchego()
        .args(["info", src.path().to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents matched: 3"))
        .stdout(predicate::str::contains("Directories with TOCs: 3"))
        .stdout(predicate::str::contains("Collapsing directories: 1"))
        .stdout(predicate::str::contains("└── b/ (collapses)"))
        .stdout(predicate::str::contains("empty").not());
}

#[test]
fn test_info_honours_ignore_names() {
    let src = sample_source();
    manchego()
        .args(["info", src.path().to_str().expect("utf8 path"), "--ignore-name", "z.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents matched: 2"))
        .stdout(predicate::str::contains("── b/").not());
}

#[cfg(unix)]
#[test]
fn test_build_end_to_end_with_fake_converter() {
    let src = sample_source();
    let tools = TempDir::new().expect("tools");
    let out = TempDir::new().expect("out");
    let script = fake_converter(tools.path());

    manchego()
        .args(["build", src.path().to_str().expect("utf8 path"), "--converter"])
        .arg(&script)
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 TOC file(s) (1 collapsed) and 2 document(s)"));

    assert_eq!(fs::read_to_string(out.path().join("a/x.rst")).expect("x.rst"), "% Ex\nx body\n");
    assert!(out.path().join("a/y.rst").exists());
    assert!(!out.path().join("b/z.rst").exists());
    let b_toc = fs::read_to_string(out.path().join("b/index.rst")).expect("b toc");
    assert!(b_toc.starts_with("Zed\n===\n"));
    assert!(b_toc.contains("z body"));
    let root_toc = fs::read_to_string(out.path().join("index.rst")).expect("root toc");
    assert!(root_toc.contains("   a/index\n"));
    assert!(root_toc.contains("   b/index\n"));
    assert!(!out.path().join("empty").exists());
}

#[cfg(unix)]
#[test]
fn test_build_dry_run_writes_nothing() {
    let src = sample_source();
    let tools = TempDir::new().expect("tools");
    let out = TempDir::new().expect("out");
    let script = fake_converter(tools.path());
    let site = out.path().join("site");

    manchego()
        .args(["build", src.path().to_str().expect("utf8 path"), "--dry-run", "--format", "json", "--converter"])
        .arg(&script)
        .arg("-o")
        .arg(&site)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"records_consumed\": 3"))
        .stdout(predicate::str::contains("\"collapsed\": true"));

    assert!(!site.exists());
}
