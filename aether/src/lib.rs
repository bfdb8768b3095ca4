//! Aether terminal desktop: a windowed dashboard for kernel telemetry streamed over WebSocket.

pub mod app;
pub mod catalog;
pub mod config;
pub mod frame;
pub mod history;
pub mod registry;
pub mod telemetry;
pub mod types;
pub mod ui;
pub mod ws;
