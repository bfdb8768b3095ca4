//! WebSocket telemetry channel: one owned connection to the bridge, with reconnect.
//!
//! The socket lives in a spawned task. The shell talks to it through two queues:
//! parsed frames and status changes come out of [`TelemetryChannel::recv`], and the
//! single outbound command goes in through [`TelemetryChannel::request_shutdown`].

use std::{fs::File, io::BufReader, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, tungstenite::Message, Connector, MaybeTlsStream,
    WebSocketStream,
};
use tracing::{debug, info, warn};

use crate::telemetry::ConnectionStatus;
use crate::types::{Frame, FrameError, SHUTDOWN_COMMAND};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("websocket: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("reading CA bundle {path}: {source}")]
    CaBundle {
        path: String,
        source: std::io::Error,
    },
    #[error("CA bundle {0} contains no certificates")]
    EmptyCaBundle(String),
    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),
}

// Connect to the bridge and return the WS stream
pub async fn connect(url: &str, tls_ca: Option<&str>) -> Result<WsStream, ChannelError> {
    match tls_ca {
        Some(path) if url.starts_with("wss://") => {
            let cfg = client_config(path)?;
            let connector = Connector::Rustls(Arc::new(cfg));
            let (ws, _) = connect_async_tls_with_config(url, None, false, Some(connector)).await?;
            Ok(ws)
        }
        Some(path) => {
            warn!(%url, ca = %path, "CA bundle ignored for a plain ws:// URL");
            let (ws, _) = connect_async(url).await?;
            Ok(ws)
        }
        None => {
            let (ws, _) = connect_async(url).await?;
            Ok(ws)
        }
    }
}

fn client_config(path: &str) -> Result<rustls::ClientConfig, ChannelError> {
    let ca_err = |source| ChannelError::CaBundle {
        path: path.to_string(),
        source,
    };
    let file = File::open(path).map_err(ca_err)?;
    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut BufReader::new(file)) {
        roots.add(cert.map_err(ca_err)?)?;
    }
    if roots.is_empty() {
        return Err(ChannelError::EmptyCaBundle(path.to_string()));
    }
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    Ok(rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// What to do when the link drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    pub fn never() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay before reconnect attempt number `attempt` (0-based), doubling up to `max`.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let factor = 1u32 << attempt.min(16);
        Some(self.initial.saturating_mul(factor).min(self.max))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Frame(Frame),
    Status(ConnectionStatus),
}

#[derive(Debug)]
enum Command {
    Send(String),
    Close,
}

enum LinkEnd {
    PeerGone,
    Closed,
}

/// Owned handle to the telemetry connection. Open once, close once.
#[derive(Debug)]
pub struct TelemetryChannel {
    events: mpsc::Receiver<ChannelEvent>,
    commands: mpsc::Sender<Command>,
    task: Option<JoinHandle<()>>,
}

impl TelemetryChannel {
    /// Spawn the connection task. Must be called inside a tokio runtime.
    pub fn open(url: impl Into<String>, tls_ca: Option<String>, policy: ReconnectPolicy) -> Self {
        let (ev_tx, ev_rx) = mpsc::channel(256);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let task = tokio::spawn(run_link(url.into(), tls_ca, policy, ev_tx, cmd_rx));
        Self {
            events: ev_rx,
            commands: cmd_tx,
            task: Some(task),
        }
    }

    /// Next frame or status change; `None` once the link task has finished.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }

    pub fn is_open(&self) -> bool {
        self.task.is_some()
    }

    /// Fire-and-forget; nothing is awaited from the peer.
    pub fn request_shutdown(&self) {
        self.send_text(SHUTDOWN_COMMAND);
    }

    fn send_text(&self, text: &str) {
        if self.task.is_none() {
            warn!(%text, "telemetry channel closed, command dropped");
            return;
        }
        if let Err(e) = self.commands.try_send(Command::Send(text.to_string())) {
            warn!(%text, error = %e, "command dropped");
        }
    }

    /// Close the connection. Calling it again is a no-op.
    pub async fn close(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = self.commands.send(Command::Close).await;
        let abort = task.abort_handle();
        if tokio::time::timeout(Duration::from_millis(500), task)
            .await
            .is_err()
        {
            abort.abort();
        }
        debug!("telemetry channel closed");
    }
}

impl Drop for TelemetryChannel {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_link(
    url: String,
    tls_ca: Option<String>,
    policy: ReconnectPolicy,
    events: mpsc::Sender<ChannelEvent>,
    mut commands: mpsc::Receiver<Command>,
) {
    let mut attempt: u32 = 0;
    loop {
        if !emit(&events, ChannelEvent::Status(ConnectionStatus::Connecting)).await {
            return;
        }
        match connect(&url, tls_ca.as_deref()).await {
            Ok(ws) => {
                info!(%url, "telemetry link up");
                attempt = 0;
                if !emit(&events, ChannelEvent::Status(ConnectionStatus::Connected)).await {
                    return;
                }
                match pump(ws, &events, &mut commands).await {
                    LinkEnd::Closed => {
                        let _ = emit(&events, ChannelEvent::Status(ConnectionStatus::Closed)).await;
                        return;
                    }
                    LinkEnd::PeerGone => info!(%url, "telemetry link lost"),
                }
            }
            Err(e) => warn!(%url, error = %e, "telemetry connect failed"),
        }

        let retry_in = policy.backoff(attempt);
        attempt = attempt.saturating_add(1);
        if !emit(&events, ChannelEvent::Status(ConnectionStatus::Disconnected { retry_in })).await {
            return;
        }

        let Some(delay) = retry_in else {
            // Permanent disconnect: just wait for the owner to close us.
            while let Some(cmd) = commands.recv().await {
                match cmd {
                    Command::Send(text) => warn!(%text, "link down, command dropped"),
                    Command::Close => break,
                }
            }
            return;
        };

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                cmd = commands.recv() => match cmd {
                    Some(Command::Send(text)) => warn!(%text, "link down, command dropped"),
                    Some(Command::Close) | None => return,
                },
            }
        }
    }
}

async fn pump(
    ws: WsStream,
    events: &mpsc::Sender<ChannelEvent>,
    commands: &mut mpsc::Receiver<Command>,
) -> LinkEnd {
    let (mut sink, mut stream) = ws.split();
    loop {
        tokio::select! {
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => match Frame::parse(&text) {
                    Ok(frame) => {
                        if !emit(events, ChannelEvent::Frame(frame)).await {
                            return LinkEnd::Closed;
                        }
                    }
                    Err(e) => warn!(error = %e, "discarding telemetry frame"),
                },
                Some(Ok(Message::Binary(b))) => {
                    warn!(error = %FrameError::Binary(b.len()), "discarding telemetry frame");
                }
                Some(Ok(Message::Close(_))) | None => return LinkEnd::PeerGone,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "telemetry read failed");
                    return LinkEnd::PeerGone;
                }
            },
            cmd = commands.recv() => match cmd {
                Some(Command::Send(text)) => {
                    debug!(%text, "sending command");
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!(error = %e, "telemetry write failed");
                        return LinkEnd::PeerGone;
                    }
                }
                Some(Command::Close) | None => {
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                    return LinkEnd::Closed;
                }
            },
        }
    }
}

// false once the shell has dropped its receiver
async fn emit(events: &mpsc::Sender<ChannelEvent>, ev: ChannelEvent) -> bool {
    events.send(ev).await.is_ok()
}
