//! Entry point for the aether shell. Parses args, sets up logging, and runs the Shell.

use std::{env, fs::OpenOptions, path::Path, sync::Mutex};

use aether::app::Shell;
use aether::config::{parse_args, ConfigError};
use aether::ws::{ReconnectPolicy, TelemetryChannel};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("AETHER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match parse_args(env::args(), env::var("AETHER_WS").ok()) {
        Ok(v) => v,
        Err(ConfigError::Help(msg)) => {
            eprintln!("{msg}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    init_logging(&cfg.log_file)?;
    info!(url = %cfg.url, reconnect = cfg.reconnect, tls_ca = ?cfg.tls_ca, "aether starting");

    if cfg.dry_run {
        println!(
            "url={} tls_ca={} reconnect={} log_file={}",
            cfg.url,
            cfg.tls_ca.as_deref().unwrap_or("-"),
            cfg.reconnect,
            cfg.log_file.display()
        );
        return Ok(());
    }

    let policy = if cfg.reconnect {
        ReconnectPolicy::default()
    } else {
        ReconnectPolicy::never()
    };
    let mut channel = TelemetryChannel::open(cfg.url.clone(), cfg.tls_ca.clone(), policy);
    let mut shell = Shell::new();
    let res = shell.run(&mut channel).await;
    channel.close().await;
    info!("aether stopped");
    res
}
