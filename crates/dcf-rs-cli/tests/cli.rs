// crates/dcf-rs-cli/tests/cli.rs

//! Drives the built `dcf` binary end to end.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("..");
    path.push("dcf-rs");
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

fn dcf(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dcf"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dcf binary")
}

#[test]
fn test_export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("left.csv");
    let input = fixture("motor_left.dcf");

    let output = dcf(&[OsStr::new("export"), input.as_os_str(), out.as_os_str()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Object type,Address,Subaddress,Name,Value,Unit,Raw value,Scale,Low limit,High limit,Access"
    );
    // 5 objects plus the three sub-entries of 0x1018.
    assert_eq!(lines.len(), 9);
    assert!(lines.contains(&"Manufacturer,0x2001,,Current Limit,25.0,A,0x0190,0.0625,0,0x7FFF,rw"));
    assert!(lines.contains(&"Optional,0x1018,0x0,Number of entries,2,,2,,,,ro"));
}

#[test]
fn test_diff_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("diff.csv");
    let left = fixture("motor_left.dcf");
    let right = fixture("motor_right.dcf");

    let output = dcf(&[
        OsStr::new("diff"),
        left.as_os_str(),
        right.as_os_str(),
        out.as_os_str(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.starts_with("Object type,Address,Subaddress,Name,Left value,"));
}

#[test]
fn test_export_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("left.json");
    let input = fixture("motor_left.dcf");

    let output = dcf(&[
        OsStr::new("--format"),
        OsStr::new("json"),
        OsStr::new("export"),
        input.as_os_str(),
        out.as_os_str(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["Manufacturer"]["8193"]["value"], serde_json::json!(25.0));
    assert_eq!(json["Mandatory"]["4096"]["name"], "Device Type");
    assert_eq!(json["Optional"]["4120"]["children"]["1"]["value"], 30);
}

#[test]
fn test_diagnostics_are_logged_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("malformed.csv");
    let input = fixture("malformed.dcf");

    let output = dcf(&[OsStr::new("export"), input.as_os_str(), out.as_os_str()]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Couldn't find object '3000'"), "stderr: {}", stderr);
    assert!(stderr.contains("Not part of a section 'Orphan=1'"), "stderr: {}", stderr);
    assert!(out.exists());
}

#[test]
fn test_usage_error_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let left = fixture("motor_left.dcf");

    // `diff` needs two inputs and one output.
    let output = dcf(&[OsStr::new("diff"), left.as_os_str(), out.as_os_str()]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let left = fixture("motor_left.dcf");
    let missing = dir.path().join("missing.dcf");

    let output = dcf(&[
        OsStr::new("diff"),
        left.as_os_str(),
        missing.as_os_str(),
        out.as_os_str(),
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {}", stderr);
}

#[test]
fn test_help_describes_every_flag() {
    let output = dcf(&[OsStr::new("--help")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in [
        "Output format of the written file",
        "Log parser progress",
        "Key holding an object's units",
        "Key holding an object's scaling factor",
    ] {
        assert!(stdout.contains(line), "missing {:?} in help: {}", line, stdout);
    }
}
