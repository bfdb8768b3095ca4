//! Top status bar: brand, uptime, kernel link flag, connection state, shutdown control.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::telemetry::{ConnectionStatus, Telemetry};
use crate::ui::layout::SHUTDOWN_LABEL;
use crate::ui::theme::{ACCENT, LINK_DOWN, LINK_UP, MUTED};

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, shutdown: Rect, t: &Telemetry) {
    let (link_text, link_color) = if t.link_up() {
        ("LINK UP", LINK_UP)
    } else {
        ("LINK DOWN", LINK_DOWN)
    };
    let conn_color = match t.status {
        ConnectionStatus::Connected => LINK_UP,
        ConnectionStatus::Connecting => MUTED,
        _ => LINK_DOWN,
    };
    let line = Line::from(vec![
        Span::styled(" AETHER", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled("OS", Style::default().fg(MUTED)),
        Span::raw("   "),
        Span::styled(format!("UPTIME: {}ms", t.snapshot.system.uptime), Style::default().fg(MUTED)),
        Span::raw("   "),
        Span::styled(link_text, Style::default().fg(link_color)),
        Span::raw("   "),
        Span::styled(format!("WS: {}", t.status.label()), Style::default().fg(conn_color)),
        Span::styled("   (q quit, S shutdown)", Style::default().fg(MUTED)),
    ]);
    f.render_widget(Paragraph::new(line), area);
    f.render_widget(
        Paragraph::new(Span::styled(SHUTDOWN_LABEL, Style::default().fg(LINK_DOWN))),
        shutdown,
    );
}
