//! Kernel console line classification.

use tracing::debug;

use crate::types::Frame;

/// Sent by the kernel's F10 setup wizard to take the bridge out of standby.
pub const ACTIVATE: &str = "CMD_START_BRIDGE";
pub const DATA_PREFIX: &str = "WEBUI_DATA:";
/// Client text that requests a kernel shutdown.
pub const SHUTDOWN_COMMAND: &str = "SHUTDOWN_F7";
/// F7 as the kernel's console sees it.
pub const SHUTDOWN_KEY: &[u8] = b"\x1b[18~";
pub const ACTIVATED_BANNER: &str = ">>> BRIDGE ACTIVATED BY KERNEL WIZARD <<<";

#[derive(Debug, Clone, PartialEq)]
pub enum KernelLine {
    Activate,
    Frame(Frame),
    Skip,
}

pub fn classify(raw: &str, standby: bool) -> KernelLine {
    let line = raw.trim();
    if line.is_empty() {
        return KernelLine::Skip;
    }
    if line == ACTIVATE {
        return KernelLine::Activate;
    }
    if standby {
        return KernelLine::Skip;
    }
    match line.strip_prefix(DATA_PREFIX) {
        Some(json) => match serde_json::from_str(json) {
            Ok(v) => KernelLine::Frame(Frame::Data(v)),
            Err(e) => {
                debug!(error = %e, "dropping malformed kernel telemetry");
                KernelLine::Skip
            }
        },
        None => KernelLine::Frame(Frame::Log(line.to_string())),
    }
}

/// First frame every new client receives.
pub fn greeting(standby: bool) -> Frame {
    let status = if standby {
        "Bridge Standby: Use F10 Setup Wizard in Kernel"
    } else {
        "Bridge Active"
    };
    Frame::Log(format!("[*] {status}"))
}
