//! Window chrome: cleared background, border, title on the left, controls on the right.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear},
};

use crate::frame::CONTROLS;
use crate::ui::theme::{ACCENT, BORDER, MUTED, WINDOW_BG};
use crate::ui::util::truncate_end;

/// Draw the frame and return the content area inside it.
pub fn draw_window(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, focused: bool) -> Rect {
    let border = if focused { ACCENT } else { BORDER };
    // leave room for the controls and both corners
    let title_room = (area.width as usize).saturating_sub(CONTROLS.len() + 3);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(WINDOW_BG))
        .title_top(Line::styled(
            truncate_end(title, title_room),
            Style::default().fg(MUTED),
        ));
    if area.width as usize >= CONTROLS.len() + 3 {
        block = block.title_top(Line::styled(CONTROLS, Style::default().fg(border)).right_aligned());
    }
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    inner
}
