//! Types that mirror the bridge's JSON frames.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed text the bridge maps to the kernel's shutdown key.
pub const SHUTDOWN_COMMAND: &str = "SHUTDOWN_F7";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    // milliseconds since kernel boot
    pub uptime: u64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub used_kb: u64,
    pub total_kb: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub rx: u64,
    // 0 = down, anything else = up
    pub link: u8,
}

impl NetworkInfo {
    pub fn is_up(&self) -> bool {
        self.link != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerInfo {
    pub devices: u32,
}

/// Latest known kernel metrics. Replaced wholesale on every DATA frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub system: SystemInfo,
    pub memory: MemoryInfo,
    pub network: NetworkInfo,
    pub explorer: ExplorerInfo,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            system: SystemInfo {
                uptime: 0,
                status: "offline".into(),
            },
            memory: MemoryInfo {
                used_kb: 0,
                total_kb: 16384,
            },
            network: NetworkInfo { rx: 0, link: 0 },
            explorer: ExplorerInfo { devices: 0 },
        }
    }
}

/// One inbound message: `{"type":"DATA","payload":{..}}` or `{"type":"LOG","payload":".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Frame {
    #[serde(rename = "DATA")]
    Data(Snapshot),
    #[serde(rename = "LOG")]
    Log(String),
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unexpected binary frame ({0} bytes)")]
    Binary(usize),
}

impl Frame {
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_frame() {
        let text = r#"{"type":"DATA","payload":{"system":{"uptime":1200,"status":"online"},
            "memory":{"used_kb":8192,"total_kb":16384},"network":{"rx":42,"link":1},
            "explorer":{"devices":3}}}"#;
        let Frame::Data(s) = Frame::parse(text).unwrap() else {
            panic!("expected DATA");
        };
        assert_eq!(s.memory.used_kb, 8192);
        assert_eq!(s.system.status, "online");
        assert!(s.network.is_up());
        assert_eq!(s.explorer.devices, 3);
    }

    #[test]
    fn parses_log_frame() {
        let f = Frame::parse(r#"{"type":"LOG","payload":"[gic] irq 27 armed"}"#).unwrap();
        assert_eq!(f, Frame::Log("[gic] irq 27 armed".into()));
    }

    #[test]
    fn rejects_unknown_type_and_garbage() {
        assert!(Frame::parse(r#"{"type":"PING","payload":1}"#).is_err());
        assert!(Frame::parse("not json").is_err());
        // DATA without the memory section is not a snapshot
        assert!(Frame::parse(r#"{"type":"DATA","payload":{"system":{"uptime":1,"status":"x"}}}"#).is_err());
    }

    #[test]
    fn default_snapshot_is_offline() {
        let s = Snapshot::default();
        assert_eq!(s.system.status, "offline");
        assert_eq!(s.memory.total_kb, 16384);
        assert!(!s.network.is_up());
    }
}
