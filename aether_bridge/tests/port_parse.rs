//! Port selection through the library's argument parser.
use aether_bridge::config::{parse_args, DEFAULT_PORT};

fn port(args: &[&str]) -> u16 {
    let argv = std::iter::once("bridge")
        .chain(args.iter().copied())
        .map(String::from);
    parse_args(argv, |_| None).unwrap().port
}

#[test]
fn port_long_short_and_assign() {
    assert_eq!(port(&["--port", "9001"]), 9001);
    assert_eq!(port(&["-p", "9002"]), 9002);
    assert_eq!(port(&["--port=9003"]), 9003);
    assert_eq!(port(&[]), DEFAULT_PORT);
}
