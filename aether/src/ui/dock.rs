//! Launcher dock: one control per catalog app, focused app highlighted.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::Paragraph,
};

use crate::registry::Registry;
use crate::ui::layout::dock_label;
use crate::ui::theme::{ACCENT, MUTED};

pub fn draw_dock(f: &mut ratatui::Frame<'_>, buttons: &[(crate::catalog::AppEntry, Rect)], reg: &Registry) {
    for (app, rect) in buttons {
        let open = reg.get(app.id).is_some_and(|w| w.is_open);
        let style = if reg.is_focused(app.id) {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if open {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(MUTED)
        };
        f.render_widget(Paragraph::new(dock_label(app)).style(style), *rect);
    }
}
