//! CLI arg parsing tests for aether (client)
use assert_cmd::prelude::*;
use std::process::Command;

fn run(args: &[&str], log: &std::path::Path) -> (bool, Option<i32>, String) {
    let output = Command::cargo_bin("aether")
        .expect("binary exists")
        .env_remove("AETHER_WS")
        .args(["--log-file", log.to_str().unwrap()])
        .args(args)
        .output()
        .expect("run aether");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), output.status.code(), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let td = tempfile::tempdir().unwrap();
    let (ok, _, text) = run(&["--help"], &td.path().join("a.log"));
    assert!(ok, "aether --help failed\n{text}");
    assert!(
        text.contains("--tls-ca") && text.contains("-t") && text.contains("--no-reconnect"),
        "help text missing expected flags\n{text}"
    );
}

#[test]
fn test_dry_run_reports_resolved_config() {
    let td = tempfile::tempdir().unwrap();
    let log = td.path().join("shell.log");
    let (ok, _, text) = run(
        &["-t", "/tmp/cert.pem", "--no-reconnect", "--dry-run", "wss://kernel:8443/ws"],
        &log,
    );
    assert!(ok, "dry run failed\n{text}");
    assert!(text.contains("url=wss://kernel:8443/ws"), "{text}");
    assert!(text.contains("tls_ca=/tmp/cert.pem"), "{text}");
    assert!(text.contains("reconnect=false"), "{text}");

    // logging went to the requested file, not the terminal
    let logged = std::fs::read_to_string(&log).expect("log file written");
    assert!(logged.contains("aether starting"), "{logged}");
}

#[test]
fn test_env_url_used_when_no_arg() {
    let td = tempfile::tempdir().unwrap();
    let out = Command::cargo_bin("aether")
        .unwrap()
        .env("AETHER_WS", "ws://10.0.2.15:8080")
        .args(["--log-file", td.path().join("b.log").to_str().unwrap(), "--dry-run"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("url=ws://10.0.2.15:8080"));
}

#[test]
fn test_bad_url_exits_with_usage() {
    let td = tempfile::tempdir().unwrap();
    let (ok, code, text) = run(&["http://not-a-socket"], &td.path().join("c.log"));
    assert!(!ok);
    assert_eq!(code, Some(2));
    assert!(text.contains("Usage:"), "{text}");
}
