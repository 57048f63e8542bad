#![cfg(all(unix, feature = "cli"))]

use std::process::Command;

fn trivdl(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_trivdl"))
        .args(args)
        .output()
        .expect("run trivdl")
}

#[test]
fn encode_prints_escaped_wire_bytes() {
    let output = trivdl(&["--format", "json", "encode", "10ba41"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["frame"], "ba0510ba4110");
    assert_eq!(json["wire"], "ba0510baba4110");
    assert_eq!(json["checksum"], 16);
}

#[test]
fn encode_rejects_oversized_payload() {
    let payload = "00".repeat(64);
    let output = trivdl(&["--format", "json", "encode", &payload]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn encode_rejects_bad_hex() {
    let output = trivdl(&["encode", "xyz"]);
    assert_eq!(output.status.code(), Some(64));
}
