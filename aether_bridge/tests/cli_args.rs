//! CLI behaviour of the aether_bridge binary.
use assert_cmd::Command;

#[test]
fn help_prints_usage() {
    let out = Command::cargo_bin("aether_bridge")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("--kernel"), "usage: {text}");
}

#[test]
fn bad_port_exits_with_usage_error() {
    Command::cargo_bin("aether_bridge")
        .unwrap()
        .args(["--port", "not-a-port"])
        .assert()
        .code(2);
}

#[test]
fn env_port_is_validated_too() {
    Command::cargo_bin("aether_bridge")
        .unwrap()
        .env("AETHER_BRIDGE_PORT", "70000")
        .assert()
        .code(2);
}
