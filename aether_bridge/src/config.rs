//! Bridge configuration from command-line flags with environment fallbacks.

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_KERNEL: &str = "127.0.0.1:1234";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub kernel_addr: String,
    pub auth_token: Option<String>,
}

impl BridgeConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}")]
    Help(String),
    #[error("{0}\n{1}")]
    Invalid(String, String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--port PORT|-p PORT] [--host ADDR] [--kernel HOST:PORT]\n\
         Env: AETHER_BRIDGE_PORT, AETHER_KERNEL_ADDR, AETHER_BRIDGE_TOKEN, AETHER_BRIDGE_LOG"
    )
}

/// Parse `args` (program name first); `env` looks up fallback variables.
pub fn parse_args<I, E>(args: I, env: E) -> Result<BridgeConfig, ConfigError>
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "aether_bridge".into());
    let invalid = |msg: String| ConfigError::Invalid(msg, usage(&prog));
    let mut port: Option<String> = None;
    let mut host: Option<String> = None;
    let mut kernel: Option<String> = None;

    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help" => return Err(ConfigError::Help(usage(&prog))),
            "--port" | "-p" => port = it.next(),
            "--host" => host = it.next(),
            "--kernel" => kernel = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ => return Err(invalid(format!("Unexpected argument {a}"))),
        }
    }

    let port = match port.or_else(|| env("AETHER_BRIDGE_PORT")) {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| invalid(format!("Bad port {p}")))?,
        None => DEFAULT_PORT,
    };
    Ok(BridgeConfig {
        host: host.unwrap_or_else(|| DEFAULT_HOST.into()),
        port,
        kernel_addr: kernel
            .or_else(|| env("AETHER_KERNEL_ADDR"))
            .unwrap_or_else(|| DEFAULT_KERNEL.into()),
        auth_token: env("AETHER_BRIDGE_TOKEN").filter(|t| !t.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_match_the_shell() {
        let c = parse_args(vec!["bridge".into()], no_env).unwrap();
        assert_eq!(c.listen_addr(), "127.0.0.1:8080");
        assert_eq!(c.kernel_addr, DEFAULT_KERNEL);
        assert_eq!(c.auth_token, None);
    }

    #[test]
    fn env_fills_gaps_but_flags_win() {
        let env = |k: &str| match k {
            "AETHER_BRIDGE_PORT" => Some("9100".to_string()),
            "AETHER_KERNEL_ADDR" => Some("10.0.2.15:1234".to_string()),
            "AETHER_BRIDGE_TOKEN" => Some("s3cret".to_string()),
            _ => None,
        };
        let c = parse_args(vec!["bridge".into()], env).unwrap();
        assert_eq!(c.port, 9100);
        assert_eq!(c.kernel_addr, "10.0.2.15:1234");
        assert_eq!(c.auth_token.as_deref(), Some("s3cret"));
        let c = parse_args(vec!["bridge".into(), "-p".into(), "9200".into()], env).unwrap();
        assert_eq!(c.port, 9200);
    }

    #[test]
    fn rejects_bad_input() {
        let bad_port = parse_args(vec!["bridge".into(), "--port=http".into()], no_env);
        assert!(matches!(bad_port, Err(ConfigError::Invalid(..))));
        let stray = parse_args(vec!["bridge".into(), "extra".into()], no_env);
        assert!(matches!(stray, Err(ConfigError::Invalid(..))));
        let help = parse_args(vec!["bridge".into(), "--help".into()], no_env);
        assert!(matches!(help, Err(ConfigError::Help(_))));
    }
}
