//! Integration tests for the `stow` CLI.
//!
//! Each test creates a temp store directory, runs `stow` as a subprocess
//! with `-C`, and verifies stdout and/or the slot files on disk.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `stow` binary.
fn stow_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("stow");
    path
}

fn stow(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(stow_bin())
        .arg("-C")
        .arg(dir.path())
        // Keep the user's real config out of the test.
        .env("XDG_CONFIG_HOME", dir.path().join("xdg-config"))
        .args(args)
        .output()
        .expect("failed to run stow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn set_then_get() {
    let dir = TempDir::new().unwrap();

    let set = stow(&dir, &["set", "counter", "5"]);
    assert!(set.status.success());

    let get = stow(&dir, &["get", "counter"]);
    assert!(get.status.success());
    assert_eq!(stdout(&get).trim(), "5");

    // The slot is a plain file other contexts can watch.
    assert_eq!(
        fs::read_to_string(dir.path().join("counter.json")).unwrap(),
        "5"
    );
}

#[test]
fn get_missing_key() {
    let dir = TempDir::new().unwrap();
    let get = stow(&dir, &["get", "nope"]);
    assert!(get.status.success());
    assert_eq!(stdout(&get).trim(), "(not set)");
}

#[test]
fn get_json_output() {
    let dir = TempDir::new().unwrap();
    stow(&dir, &["set", "user", r#"{"theme":"dark"}"#]);

    let get = stow(&dir, &["--json", "get", "user"]);
    assert!(get.status.success());
    let parsed: serde_json::Value = serde_json::from_str(stdout(&get).trim()).unwrap();
    assert_eq!(parsed["key"], "user");
    assert_eq!(parsed["present"], true);
    assert_eq!(parsed["value"]["theme"], "dark");
}

#[test]
fn set_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let set = stow(&dir, &["set", "user", "{broken"]);
    assert!(!set.status.success());
    let stderr = String::from_utf8_lossy(&set.stderr);
    assert!(stderr.contains("error"), "stderr was: {stderr}");
    assert!(!dir.path().join("user.json").exists());
}

#[test]
fn list_and_rm() {
    let dir = TempDir::new().unwrap();
    stow(&dir, &["set", "search", "\"milk\""]);
    stow(&dir, &["set", "moveMode", "true"]);

    let list = stow(&dir, &["list"]);
    let text = stdout(&list);
    assert!(text.contains("search"));
    assert!(text.contains("moveMode"));

    let rm = stow(&dir, &["rm", "search"]);
    assert!(rm.status.success());

    let list = stdout(&stow(&dir, &["list"]));
    assert!(!list.contains("search"));
    assert!(list.contains("moveMode"));
}

#[test]
fn list_empty_store() {
    let dir = TempDir::new().unwrap();
    assert_eq!(stdout(&stow(&dir, &["list"])).trim(), "(empty store)");
}

#[test]
fn path_prints_store_dir() {
    let dir = TempDir::new().unwrap();
    let path = stow(&dir, &["path"]);
    assert!(path.status.success());
    assert_eq!(stdout(&path).trim(), dir.path().to_string_lossy());
}
