//! Integration test: Verify binary prints correct version

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_polyview"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected version in output, got: {}",
        stdout
    );
}

#[test]
fn binary_rejects_unknown_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_polyview"))
        .arg("--no-such-flag")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
