//! Kernel console link: connect, read lines, fan frames out, reconnect on failure.

use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{tcp::OwnedReadHalf, TcpStream};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::relay::{classify, KernelLine, ACTIVATED_BANNER};
use crate::state::AppState;
use crate::types::Frame;

/// Wait after the kernel was unreachable or the link failed; standby is restored.
pub const RETRY_UNREACHABLE: Duration = Duration::from_secs(2);
/// Wait after the kernel closed an established link.
pub const RETRY_CLOSED: Duration = Duration::from_secs(1);

// Runs for the life of the process.
pub async fn run_kernel_link(addr: String, state: AppState) {
    loop {
        info!(%addr, "connecting to kernel");
        let stream = match TcpStream::connect(&addr).await {
            Ok(s) => s,
            Err(e) => {
                warn!(%addr, error = %e, "kernel not found, retrying");
                state.set_standby(true);
                sleep(RETRY_UNREACHABLE).await;
                continue;
            }
        };

        let (read, write) = stream.into_split();
        *state.kernel.lock().await = Some(write);
        info!("kernel link established, waiting for setup wizard (F10)");

        let res = pump_lines(read, &state).await;
        *state.kernel.lock().await = None;
        match res {
            Ok(()) => {
                info!("kernel closed the link");
                sleep(RETRY_CLOSED).await;
            }
            Err(e) => {
                warn!(error = %e, "kernel link broke");
                state.set_standby(true);
                sleep(RETRY_UNREACHABLE).await;
            }
        }
    }
}

async fn pump_lines(read: OwnedReadHalf, state: &AppState) -> io::Result<()> {
    let mut reader = BufReader::new(read);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        // the console is not guaranteed to be valid UTF-8
        handle_line(&String::from_utf8_lossy(&buf), state);
    }
}

pub fn handle_line(raw: &str, state: &AppState) {
    match classify(raw, state.is_standby()) {
        KernelLine::Activate => {
            info!("setup wizard activated the bridge");
            state.set_standby(false);
            state.broadcast(&Frame::Log(ACTIVATED_BANNER.into()));
        }
        KernelLine::Frame(frame) => state.broadcast(&frame),
        KernelLine::Skip => {}
    }
}
