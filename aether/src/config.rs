//! Command-line and environment configuration for the shell.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_URL: &str = "ws://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub url: String,
    pub tls_ca: Option<String>,
    pub reconnect: bool,
    pub log_file: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `--help` was requested; carries the usage text.
    #[error("{0}")]
    Help(String),
    #[error("{0}\n{1}")]
    Invalid(String, String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--tls-ca CERT_PEM|-t CERT_PEM] [--no-reconnect] [--log-file PATH] [--dry-run] [ws://HOST:PORT]\n\
         Env: AETHER_WS (default URL), AETHER_LOG (log filter, default info)"
    )
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("aether.log")
}

/// Parse `args` (program name first). `env_url` is the `AETHER_WS` fallback.
pub fn parse_args<I: IntoIterator<Item = String>>(
    args: I,
    env_url: Option<String>,
) -> Result<ShellConfig, ConfigError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "aether".into());
    let invalid = |msg: String| ConfigError::Invalid(msg, usage(&prog));
    let mut url: Option<String> = None;
    let mut tls_ca: Option<String> = None;
    let mut log_file: Option<PathBuf> = None;
    let mut reconnect = true;
    let mut dry_run = false;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ConfigError::Help(usage(&prog))),
            "--tls-ca" | "-t" => {
                tls_ca = Some(it.next().ok_or_else(|| invalid(format!("{arg} needs a path")))?);
            }
            "--log-file" => {
                let v = it.next().ok_or_else(|| invalid("--log-file needs a path".into()))?;
                log_file = Some(PathBuf::from(v));
            }
            "--no-reconnect" => reconnect = false,
            "--dry-run" => dry_run = true,
            _ if arg.starts_with("--tls-ca=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        tls_ca = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => return Err(invalid(format!("Unknown option {arg}"))),
            _ => {
                if url.is_some() {
                    return Err(invalid(format!("Unexpected argument {arg}")));
                }
                url = Some(arg);
            }
        }
    }

    let url = url
        .or(env_url.filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    let parsed = url::Url::parse(&url).map_err(|e| invalid(format!("Bad URL {url}: {e}")))?;
    if !matches!(parsed.scheme(), "ws" | "wss") {
        return Err(invalid(format!("URL must be ws:// or wss://, got {url}")));
    }
    if tls_ca.is_some() && parsed.scheme() == "ws" {
        return Err(invalid(format!("--tls-ca needs a wss:// URL, got {url}")));
    }

    Ok(ShellConfig {
        url,
        tls_ca,
        reconnect,
        log_file: log_file.unwrap_or_else(default_log_file),
        dry_run,
    })
}
