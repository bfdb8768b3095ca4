//! Shared UI palette.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(0, 242, 255);
pub const BORDER: Color = Color::Rgb(31, 41, 55);
pub const DESKTOP_BG: Color = Color::Rgb(5, 5, 5);
pub const WINDOW_BG: Color = Color::Rgb(10, 10, 10);
pub const MUTED: Color = Color::Rgb(107, 114, 128);
pub const LINK_UP: Color = Color::Green;
pub const LINK_DOWN: Color = Color::Red;
