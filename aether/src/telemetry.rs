//! Shell-side telemetry state: latest snapshot, log tail, memory history, link status.

use std::time::Duration;

use crate::history::{HistorySeries, LogBuffer};
use crate::types::{Frame, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    /// Peer went away. `retry_in` is `None` when no reconnect will be attempted.
    Disconnected { retry_in: Option<Duration> },
    Closed,
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "CONNECTING".into(),
            ConnectionStatus::Connected => "CONNECTED".into(),
            ConnectionStatus::Disconnected { retry_in: Some(d) } => {
                format!("OFFLINE (retry {}s)", d.as_secs().max(1))
            }
            ConnectionStatus::Disconnected { retry_in: None } => "OFFLINE".into(),
            ConnectionStatus::Closed => "CLOSED".into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    pub snapshot: Snapshot,
    pub logs: LogBuffer,
    pub history: HistorySeries,
    pub status: ConnectionStatus,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one inbound frame. `now` labels the history point a DATA frame adds.
    pub fn apply(&mut self, frame: Frame, now: &str) {
        match frame {
            Frame::Data(snapshot) => {
                self.history.push(now, snapshot.memory.used_kb);
                self.snapshot = snapshot;
            }
            Frame::Log(line) => self.logs.push(line),
        }
    }

    pub fn link_up(&self) -> bool {
        self.snapshot.network.is_up()
    }
}

// Local wall clock, time only
pub fn clock_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
