//! Aether bridge: relays the kernel's TCP console to WebSocket clients.

pub mod config;
pub mod link;
pub mod relay;
pub mod state;
pub mod types;
pub mod ws;
