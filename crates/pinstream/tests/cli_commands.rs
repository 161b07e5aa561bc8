#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn pinstream(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pinstream"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("PINSTREAM_CHANNELS")
        .env_remove("PINSTREAM_PERIOD")
        .env_remove("PINSTREAM_CHIP")
        .output()
        .expect("pinstream should run")
}

#[test]
fn channels_json_lists_columns_in_order() {
    let output = pinstream(&["--format", "json", "--channels", "14,0", "channels"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        r#"{"count":2,"columns":[{"column":0,"channel":14},{"column":1,"channel":0}]}"#
    );
}

#[test]
fn channels_raw_prints_default_table() {
    let output = pinstream(&["--format", "raw", "channels"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "0,2,3,7,12,13,14,15,16\n"
    );
}

#[test]
fn doctor_passes_with_simulated_backend() {
    let output = pinstream(&["--format", "json", "--backend", "sim", "doctor"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"overall\":\"pass\""));
    assert!(stdout.contains("\"name\":\"backend_setup\""));
}

#[test]
fn doctor_reports_failed_setup() {
    let output = pinstream(&[
        "--format",
        "raw",
        "--backend",
        "sim",
        "--sim-fail-setup",
        "doctor",
    ]);

    assert_eq!(output.status.code(), Some(30));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "fail");
}

#[cfg(target_os = "linux")]
#[test]
fn doctor_fails_for_missing_chip() {
    let output = pinstream(&[
        "--format",
        "json",
        "--chip",
        "/nonexistent/pinstream-gpiochip",
        "doctor",
    ]);

    assert_eq!(output.status.code(), Some(30));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"name\":\"chip_device\",\"status\":\"fail\""));
}

#[test]
fn version_extended_reports_defaults() {
    let output = pinstream(&["version", "--extended"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: pinstream"));
    assert!(stdout.contains("default_channels: 0,2,3,7,12,13,14,15,16"));
    assert!(stdout.contains("default_period_ms: 100"));
}
