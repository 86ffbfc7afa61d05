#![deny(clippy::all, clippy::pedantic)]

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn corpus() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("2025-05-25-stack-frames.md"),
        "---\ntitle: Stack Frames in C\ndate: 2025-05-25 08:00:00\ncategories:\n  - Programming Language\n---\nBody.\n",
    )
    .expect("write post");
    fs::write(
        dir.path().join("2025-07-10-boot-order.md"),
        "---\ntitle: UEFI Boot Order\ndate: 2025-07-10 09:00:00\ncategories:\n  - How-To\n---\nBody.\n",
    )
    .expect("write post");
    dir
}

fn quaderno() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("quaderno"))
}

#[test]
fn list_prints_newest_first() {
    let dir = corpus();
    let assert = quaderno()
        .arg("list")
        .arg("--store-root")
        .arg(dir.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let boot = stdout.find("UEFI Boot Order").expect("newest post listed");
    let stack = stdout.find("Stack Frames in C").expect("older post listed");
    assert!(boot < stack, "expected newest first:\n{stdout}");
}

#[test]
fn list_json_is_machine_readable() {
    let dir = corpus();
    let assert = quaderno()
        .arg("list")
        .arg("--store-root")
        .arg(dir.path())
        .arg("--json")
        .arg("--category")
        .arg("How-To")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let posts = parsed.as_array().expect("array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["key"]["slug"], "boot-order");
}

#[test]
fn show_prints_one_post() {
    let dir = corpus();
    quaderno()
        .arg("show")
        .arg("--store-root")
        .arg(dir.path())
        .arg("2025-05-25")
        .arg("stack-frames")
        .arg("--body")
        .assert()
        .success()
        .stdout(contains("title: Stack Frames in C"))
        .stdout(contains("Body."));
}

#[test]
fn show_unknown_key_fails() {
    let dir = corpus();
    quaderno()
        .arg("show")
        .arg("--store-root")
        .arg(dir.path())
        .arg("2025-05-25")
        .arg("missing")
        .assert()
        .failure()
        .stderr(contains("no post at"));
}

#[test]
fn check_passes_on_a_clean_corpus() {
    let dir = corpus();
    quaderno()
        .arg("check")
        .arg("--store-root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("ok: 2 published post(s)"));
}

#[test]
fn check_reports_every_violation_and_fails() {
    let dir = corpus();
    fs::write(
        dir.path().join("2025-08-01-broken.md"),
        "---\ntitle:\ntags: [dup, dup]\n---\n```c\nint x;\n",
    )
    .expect("write post");

    quaderno()
        .arg("check")
        .arg("--store-root")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(contains("2025-08-01-broken.md"))
        .stdout(contains("title is missing or empty"))
        .stdout(contains("`date` field is missing"))
        .stdout(contains("appears more than once"))
        .stdout(contains("never closed"))
        .stderr(contains("1 file(s) failed validation"));
}

#[test]
fn export_writes_a_toml_archive() {
    let dir = corpus();
    let out = dir.path().join("corpus.toml");
    quaderno()
        .arg("export")
        .arg("--store-root")
        .arg(dir.path())
        .arg(&out)
        .assert()
        .success();

    let archive = fs::read_to_string(&out).expect("archive written");
    assert!(archive.contains("[[posts]]"));
    assert!(archive.contains("slug = \"boot-order\""));
    assert!(archive.contains("title: Stack Frames in C"));
}
