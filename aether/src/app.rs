//! Shell state and main loop: input routing, telemetry updates, window lifecycle, and drawing.

use std::{collections::BTreeMap, io};

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, style::Style, widgets::Block, Terminal};
use tracing::{debug, info};

use crate::catalog::{initial_registry, APPS};
use crate::frame::{FrameRequest, WindowFrame};
use crate::registry::Registry;
use crate::telemetry::{clock_label, Telemetry};
use crate::ui::{
    dock::draw_dock,
    layout::ShellLayout,
    panels::{default_panels, PanelMap},
    status::draw_status,
    theme::DESKTOP_BG,
    util::point_in_rect,
    window::draw_window,
};
use crate::ws::{ChannelEvent, TelemetryChannel};

/// Requests the shell cannot satisfy on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Shutdown,
}

pub struct Shell {
    registry: Registry,
    // one per visible window
    frames: BTreeMap<String, WindowFrame>,
    // id of the only frame receiving pointer moves
    dragging: Option<String>,
    telemetry: Telemetry,
    panels: PanelMap,
    should_quit: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_registry(initial_registry())
    }

    pub fn with_registry(registry: Registry) -> Self {
        let mut shell = Self {
            registry,
            frames: BTreeMap::new(),
            dragging: None,
            telemetry: Telemetry::new(),
            panels: default_panels(),
            should_quit: false,
        };
        shell.sync_frames();
        shell
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn frame(&self, id: &str) -> Option<&WindowFrame> {
        self.frames.get(id)
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self, channel: &mut TelemetryChannel) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, channel).await;

        // Teardown
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        channel: &mut TelemetryChannel,
    ) -> anyhow::Result<()> {
        let mut input = EventStream::new();
        let mut channel_done = false;
        terminal.draw(|f| self.draw(f))?;

        // Redraw only after something happened; no tick.
        loop {
            tokio::select! {
                ev = input.next() => match ev {
                    Some(Ok(ev)) => {
                        let sz = terminal.size()?;
                        let area = Rect::new(0, 0, sz.width, sz.height);
                        if let Some(ShellCommand::Shutdown) = self.handle_event(ev, area) {
                            info!("shutdown requested");
                            channel.request_shutdown();
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                ev = channel.recv(), if !channel_done => match ev {
                    Some(ev) => self.apply_channel_event(ev),
                    None => channel_done = true,
                },
            }
            if self.should_quit {
                break;
            }
            terminal.draw(|f| self.draw(f))?;
        }
        Ok(())
    }

    pub fn apply_channel_event(&mut self, ev: ChannelEvent) {
        match ev {
            ChannelEvent::Frame(frame) => self.telemetry.apply(frame, &clock_label()),
            ChannelEvent::Status(status) => {
                info!(status = %status.label(), "telemetry link");
                self.telemetry.status = status;
            }
        }
    }

    pub fn handle_event(&mut self, ev: Event, area: Rect) -> Option<ShellCommand> {
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k),
            Event::Mouse(m) => self.handle_mouse(m, area),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, k: KeyEvent) -> Option<ShellCommand> {
        match k.code {
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('S') => return Some(ShellCommand::Shutdown),
            KeyCode::Char('m') => {
                if let Some(id) = self.registry.focused().map(str::to_string) {
                    self.set_registry(self.registry.minimize(&id));
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.registry.focused().map(str::to_string) {
                    self.set_registry(self.registry.close(&id));
                }
            }
            KeyCode::Tab => {
                if let Some(id) = self.registry.next_visible().map(str::to_string) {
                    self.set_registry(self.registry.focus(&id));
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                if let Some(app) = APPS.get(idx) {
                    self.activate_app(app.id);
                }
            }
            _ => {}
        }
        None
    }

    pub fn handle_mouse(&mut self, m: MouseEvent, area: Rect) -> Option<ShellCommand> {
        let layout = ShellLayout::new(area);
        match m.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = self.dragging.as_deref() {
                    let p = layout.to_desktop_clamped(m.column, m.row);
                    if let Some(frame) = self.frames.get_mut(id) {
                        frame.pointer_move(p);
                    }
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.end_drag();
                None
            }
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(m.column, m.row, &layout),
            _ => None,
        }
    }

    /// Dock activation: open, then focus.
    pub fn activate_app(&mut self, id: &str) {
        self.set_registry(self.registry.open(id).focus(id));
    }

    fn pointer_down(&mut self, col: u16, row: u16, layout: &ShellLayout) -> Option<ShellCommand> {
        if point_in_rect(col, row, layout.shutdown_button()) {
            return Some(ShellCommand::Shutdown);
        }
        if let Some((app, _)) = layout
            .dock_buttons()
            .into_iter()
            .find(|(_, r)| point_in_rect(col, row, *r))
        {
            self.activate_app(app.id);
            return None;
        }
        if !point_in_rect(col, row, layout.desktop) {
            return None;
        }

        let p = layout.to_desktop(col, row);
        let bounds = layout.desktop_size();
        // front-most frame under the pointer
        let hit = self
            .registry
            .stacking_order()
            .into_iter()
            .rev()
            .find_map(|w| {
                let frame = self.frames.get(w.id())?;
                frame.hit_test(p, bounds).map(|h| (w.id().to_string(), h))
            });
        let (id, hit) = hit?;

        self.end_drag();
        let frame = self.frames.get_mut(&id)?;
        let request = frame.pointer_down(p, hit);
        if frame.is_dragging() {
            self.dragging = Some(id.clone());
        }

        self.set_registry(self.registry.focus(&id));
        match request {
            FrameRequest::Focus => {}
            FrameRequest::Minimize => self.set_registry(self.registry.minimize(&id)),
            FrameRequest::Close => self.set_registry(self.registry.close(&id)),
        }
        None
    }

    fn end_drag(&mut self) {
        let Some(id) = self.dragging.take() else {
            return;
        };
        let Some(frame) = self.frames.get_mut(&id) else {
            return;
        };
        if let Some(pos) = frame.pointer_up() {
            let size = frame.size();
            debug!(%id, x = pos.x, y = pos.y, "window moved");
            self.set_registry(self.registry.commit_position(&id, pos, size));
        }
    }

    fn set_registry(&mut self, next: Registry) {
        self.registry = next;
        self.sync_frames();
    }

    // Mount frames for newly visible windows, unmount hidden ones.
    fn sync_frames(&mut self) {
        let registry = &self.registry;
        self.frames
            .retain(|id, _| registry.get(id).is_some_and(|w| w.is_visible()));
        for w in registry.windows().iter().filter(|w| w.is_visible()) {
            self.frames
                .entry(w.id().to_string())
                .or_insert_with(|| WindowFrame::mount(w));
        }
        let orphaned = self
            .dragging
            .as_deref()
            .is_some_and(|id| !self.frames.contains_key(id));
        if orphaned {
            debug!(id = ?self.dragging, "drag abandoned, window unmounted");
            self.dragging = None;
        }
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let layout = ShellLayout::new(f.area());

        draw_status(f, layout.status, layout.shutdown_button(), &self.telemetry);
        f.render_widget(
            Block::default().style(Style::default().bg(DESKTOP_BG)),
            layout.desktop,
        );

        // back to front
        for w in self.registry.stacking_order() {
            let Some(frame) = self.frames.get(w.id()) else {
                continue;
            };
            let Some((pos, size)) = frame.visible_area(layout.desktop_size()) else {
                continue;
            };
            let rect = layout.to_screen(pos, size);
            let inner = draw_window(f, rect, &w.title, self.registry.is_focused(w.id()));
            if let Some(panel) = self.panels.get(w.id()) {
                panel.draw(f, inner, &self.telemetry);
            }
        }

        draw_dock(f, &layout.dock_buttons(), &self.registry);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
