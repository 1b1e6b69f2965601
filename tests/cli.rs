//! Exit-code behaviour of the built binaries.
#![cfg(unix)]

use std::process::Command;

#[test]
fn missing_namespace_is_a_usage_error() {
    let out = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_collect-logs"))
        .current_dir(out.path())
        .output()
        .unwrap();

    assert!(!status.status.success());
    assert!(!status.stderr.is_empty());
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn missing_artifacts_dir_is_a_usage_error() {
    let out = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_collect-logs"))
        .arg("ephemeral-1")
        .current_dir(out.path())
        .output()
        .unwrap();

    assert!(!status.status.success());
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn passthrough_forwards_arguments_and_exit_code() {
    let status = Command::new(env!("CARGO_BIN_EXE_oc-passthrough"))
        .env("OC_BIN", "sh")
        .args(["-c", "echo forwarded; exit 3"])
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&status.stdout), "forwarded\n");
}

#[test]
fn passthrough_reports_missing_binary() {
    let status = Command::new(env!("CARGO_BIN_EXE_oc-passthrough"))
        .env("OC_BIN", "/nonexistent/oc")
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(127));
}

#[test]
fn namespace_with_path_is_rejected_before_writing() {
    let out = tempfile::tempdir().unwrap();
    let escape = out.path().join("escape");
    let status = Command::new(env!("CARGO_BIN_EXE_collect-logs"))
        .arg(&escape)
        .arg("artifacts")
        .current_dir(out.path())
        .env("OC_BIN", "/nonexistent/oc")
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(2));
    assert!(!escape.exists());
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}
