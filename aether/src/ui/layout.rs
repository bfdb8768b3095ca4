//! Screen regions shared by drawing and hit-testing, so both always agree.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::catalog::{AppEntry, APPS};
use crate::registry::{Point, Size};

pub const SHUTDOWN_LABEL: &str = "[SHUTDOWN]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLayout {
    pub status: Rect,
    pub desktop: Rect,
    pub dock: Rect,
}

impl ShellLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // status bar
                Constraint::Min(0),    // desktop
                Constraint::Length(1), // dock
            ])
            .split(area);
        Self {
            status: rows[0],
            desktop: rows[1],
            dock: rows[2],
        }
    }

    /// Screen cell to desktop coordinates.
    pub fn to_desktop(&self, col: u16, row: u16) -> Point {
        Point::new(
            i32::from(col) - i32::from(self.desktop.x),
            i32::from(row) - i32::from(self.desktop.y),
        )
    }

    pub fn desktop_size(&self) -> Size {
        Size::new(self.desktop.width, self.desktop.height)
    }

    /// Desktop cell area (already clipped to the desktop) to a screen rect.
    pub fn to_screen(&self, pos: Point, size: Size) -> Rect {
        let x = u16::try_from(pos.x.max(0)).unwrap_or(u16::MAX);
        let y = u16::try_from(pos.y.max(0)).unwrap_or(u16::MAX);
        Rect::new(
            self.desktop.x.saturating_add(x),
            self.desktop.y.saturating_add(y),
            size.w,
            size.h,
        )
    }

    /// Like [`Self::to_desktop`] but pinned inside the desktop, so a dragged
    /// title bar can never leave it vertically.
    pub fn to_desktop_clamped(&self, col: u16, row: u16) -> Point {
        let p = self.to_desktop(col, row);
        let max_x = i32::from(self.desktop.width.saturating_sub(1));
        let max_y = i32::from(self.desktop.height.saturating_sub(1));
        Point::new(p.x.clamp(0, max_x), p.y.clamp(0, max_y))
    }

    pub fn shutdown_button(&self) -> Rect {
        let w = (SHUTDOWN_LABEL.len() as u16).min(self.status.width);
        Rect::new(self.status.right().saturating_sub(w), self.status.y, w, 1)
    }

    /// Dock buttons, centered, one per catalog entry.
    pub fn dock_buttons(&self) -> Vec<(AppEntry, Rect)> {
        let widths: Vec<u16> = APPS.iter().map(|a| dock_label(a).len() as u16).collect();
        let total: u16 = widths.iter().sum::<u16>() + widths.len().saturating_sub(1) as u16;
        let mut x = self.dock.x + self.dock.width.saturating_sub(total) / 2;
        let mut out = Vec::with_capacity(APPS.len());
        for (app, w) in APPS.iter().zip(widths) {
            out.push((*app, Rect::new(x, self.dock.y, w, 1)));
            x = x.saturating_add(w + 1);
        }
        out
    }
}

pub fn dock_label(app: &AppEntry) -> String {
    format!("[ {} ]", app.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_status_desktop_dock() {
        let l = ShellLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(l.status, Rect::new(0, 0, 100, 1));
        assert_eq!(l.desktop, Rect::new(0, 1, 100, 28));
        assert_eq!(l.dock, Rect::new(0, 29, 100, 1));
    }

    #[test]
    fn desktop_coordinates() {
        let l = ShellLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(l.to_desktop(10, 5), Point::new(10, 4));
        assert_eq!(l.to_desktop_clamped(10, 0), Point::new(10, 0));
        assert_eq!(l.to_desktop_clamped(10, 29), Point::new(10, 27));
        assert_eq!(l.desktop_size(), Size::new(100, 28));
        assert_eq!(
            l.to_screen(Point::new(4, 2), Size::new(10, 5)),
            Rect::new(4, 3, 10, 5)
        );
    }

    #[test]
    fn dock_buttons_are_centered_and_disjoint() {
        let l = ShellLayout::new(Rect::new(0, 0, 100, 30));
        let buttons = l.dock_buttons();
        assert_eq!(buttons.len(), APPS.len());
        // "[ KLOG ]" + "[ MONITOR ]" + "[ EXPLORER ]" + 2 gaps = 8 + 11 + 12 + 2
        assert_eq!(buttons[0].1.x, (100 - 33) / 2);
        for pair in buttons.windows(2) {
            assert!(pair[0].1.right() < pair[1].1.x);
        }
    }

    #[test]
    fn shutdown_button_sits_at_the_right_edge() {
        let l = ShellLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(l.shutdown_button(), Rect::new(90, 0, 10, 1));
    }
}
