//! aether_bridge: kernel console to WebSocket relay.

use std::env;

use aether_bridge::config::{parse_args, ConfigError};
use aether_bridge::link::run_kernel_link;
use aether_bridge::state::AppState;
use aether_bridge::ws::router;
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match parse_args(env::args(), |k| env::var(k).ok()) {
        Ok(v) => v,
        Err(ConfigError::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let filter =
        EnvFilter::try_from_env("AETHER_BRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::new(cfg.auth_token.clone());
    tokio::spawn(run_kernel_link(cfg.kernel_addr.clone(), state.clone()));

    let addr = cfg.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, kernel = %cfg.kernel_addr, auth = cfg.auth_token.is_some(), "bridge listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("interrupt received, stopping");
        })
        .await
        .context("serving websocket clients")?;
    Ok(())
}
