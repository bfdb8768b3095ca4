//! Window contents, looked up by window id.
//!
//! New windows get content by adding an entry to [`default_panels`]; neither the
//! registry nor the frame needs to know what is drawn inside.

use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Sparkline},
};

use crate::catalog::{EXPLORER, KLOG, MONITOR};
use crate::telemetry::Telemetry;
use crate::ui::theme::{ACCENT, LINK_DOWN, LINK_UP, MUTED};
use crate::ui::util::human;

pub trait PanelView {
    fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect, t: &Telemetry);
}

pub type PanelMap = BTreeMap<&'static str, Box<dyn PanelView>>;

pub fn default_panels() -> PanelMap {
    let mut m: PanelMap = BTreeMap::new();
    m.insert(KLOG, Box::new(LogPanel));
    m.insert(MONITOR, Box::new(MonitorPanel));
    m.insert(EXPLORER, Box::new(ExplorerPanel));
    m
}

/// Raw kernel log tail, newest line at the bottom.
pub struct LogPanel;

impl PanelView for LogPanel {
    fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect, t: &Telemetry) {
        if area.height == 0 {
            return;
        }
        let skip = t.logs.len().saturating_sub(area.height as usize);
        let lines: Vec<Line> = t
            .logs
            .iter()
            .skip(skip)
            .map(|l| Line::from(l.to_string()))
            .collect();
        f.render_widget(Paragraph::new(lines).style(Style::default().fg(ACCENT)), area);
    }
}

/// Memory gauge over a rolling sparkline of used KB.
pub struct MonitorPanel;

impl PanelView for MonitorPanel {
    fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect, t: &Telemetry) {
        if area.height < 3 {
            return;
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // gauge
                Constraint::Min(1),    // chart
                Constraint::Length(1), // time axis
            ])
            .split(area);

        let mem = &t.snapshot.memory;
        let pct = if mem.total_kb > 0 {
            (mem.used_kb as f64 / mem.total_kb as f64 * 100.0).clamp(0.0, 100.0) as u16
        } else {
            0
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(ACCENT))
            .percent(pct)
            .label(format!(
                "MEM {} / {}",
                human(mem.used_kb.saturating_mul(1024)),
                human(mem.total_kb.saturating_mul(1024))
            ));
        f.render_widget(gauge, rows[0]);

        let max_points = rows[1].width as usize;
        let values = t.history.values();
        let start = values.len().saturating_sub(max_points);
        let spark = Sparkline::default()
            .data(&values[start..])
            .max(mem.total_kb.max(1))
            .style(Style::default().fg(ACCENT));
        f.render_widget(spark, rows[1]);

        let axis = match (t.history.first(), t.history.last()) {
            (Some(a), Some(b)) => {
                let gap = (rows[2].width as usize).saturating_sub(a.time.len() + b.time.len());
                format!("{}{}{}", a.time, " ".repeat(gap), b.time)
            }
            _ => "waiting for samples...".into(),
        };
        f.render_widget(Paragraph::new(axis).style(Style::default().fg(MUTED)), rows[2]);
    }
}

/// Device and link summary from the latest snapshot.
pub struct ExplorerPanel;

impl PanelView for ExplorerPanel {
    fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect, t: &Telemetry) {
        let s = &t.snapshot;
        let (link, color) = if s.network.is_up() {
            ("UP", LINK_UP)
        } else {
            ("DOWN", LINK_DOWN)
        };
        let label = |k: &'static str| Span::styled(format!("{k:<10}"), Style::default().fg(MUTED));
        let lines = vec![
            Line::from(vec![label("DEVICES"), Span::raw(s.explorer.devices.to_string())]),
            Line::from(vec![label("LINK"), Span::styled(link, Style::default().fg(color))]),
            Line::from(vec![label("RX"), Span::raw(s.network.rx.to_string())]),
            Line::from(vec![label("STATUS"), Span::raw(s.system.status.clone())]),
        ];
        f.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_app_has_a_panel() {
        let panels = default_panels();
        for app in crate::catalog::APPS {
            assert!(panels.contains_key(app.id), "no panel for {}", app.id);
        }
    }
}
