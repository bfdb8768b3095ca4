//! Shared bridge state: client fan-out, kernel write half, standby flag.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

use crate::types::Frame;

pub type SharedKernel = Arc<Mutex<Option<OwnedWriteHalf>>>;

#[derive(Clone)]
pub struct AppState {
    // Serialized frames for every connected client
    pub frames: broadcast::Sender<String>,
    // Present only while the kernel link is up
    pub kernel: SharedKernel,
    pub standby: Arc<AtomicBool>,
    pub client_count: Arc<AtomicUsize>,
    pub auth_token: Option<String>,
}

impl AppState {
    pub fn new(auth_token: Option<String>) -> Self {
        let (frames, _) = broadcast::channel(256);
        Self {
            frames,
            kernel: Arc::new(Mutex::new(None)),
            standby: Arc::new(AtomicBool::new(true)),
            client_count: Arc::new(AtomicUsize::new(0)),
            auth_token,
        }
    }

    pub fn is_standby(&self) -> bool {
        self.standby.load(Ordering::Relaxed)
    }

    pub fn set_standby(&self, on: bool) {
        self.standby.store(on, Ordering::Relaxed);
    }

    /// Send to every client; a no-op when nobody is connected.
    pub fn broadcast(&self, frame: &Frame) {
        match frame.to_json() {
            Ok(js) => {
                let _ = self.frames.send(js);
            }
            Err(e) => warn!(error = %e, "frame serialization failed"),
        }
    }
}
