//! Window frame: per-window drag state machine over a working-copy position.
//!
//! A frame is mounted from its descriptor when the window becomes visible and
//! dropped when it is minimized or closed. While dragging, only the frame's own
//! position moves; the registry sees the result once, on pointer-up, when the
//! shell commits it.

use crate::registry::{Point, Size, WindowDescriptor};

// Title bar controls, right-aligned on the top border: "[_][x]"
pub const CONTROLS: &str = "[_][x]";
const CONTROLS_W: i32 = 6;

/// Which part of a frame a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    TitleBar,
    Minimize,
    Close,
    Body,
}

/// What the frame asks the registry to do after a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    Focus,
    /// Focus, then minimize.
    Minimize,
    /// Focus, then close.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { offset: Point },
}

#[derive(Debug, Clone)]
pub struct WindowFrame {
    id: String,
    position: Point,
    size: Size,
    drag: DragState,
}

impl WindowFrame {
    pub fn mount(desc: &WindowDescriptor) -> Self {
        let (position, size) = desc.geometry();
        Self {
            id: desc.id().to_string(),
            position,
            size,
            drag: DragState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Working-copy position; diverges from the descriptor while dragging.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// The part of this frame inside a desktop of `bounds` cells, as drawn.
    pub fn visible_area(&self, bounds: Size) -> Option<(Point, Size)> {
        let left = self.position.x.max(0);
        let top = self.position.y.max(0);
        let right = (self.position.x + i32::from(self.size.w)).min(i32::from(bounds.w));
        let bottom = (self.position.y + i32::from(self.size.h)).min(i32::from(bounds.h));
        if right <= left || bottom <= top {
            return None;
        }
        // both spans fit in u16: they lie inside `bounds`
        let size = Size::new((right - left) as u16, (bottom - top) as u16);
        Some((Point::new(left, top), size))
    }

    /// Locate `p` on the visible part of this frame. The title bar is the top
    /// border row; the controls sit at the right end of the visible title bar.
    pub fn hit_test(&self, p: Point, bounds: Size) -> Option<FrameHit> {
        let (origin, size) = self.visible_area(bounds)?;
        let (x0, y0) = (origin.x, origin.y);
        let (w, h) = (i32::from(size.w), i32::from(size.h));
        if p.x < x0 || p.x >= x0 + w || p.y < y0 || p.y >= y0 + h {
            return None;
        }
        if p.y != y0 {
            return Some(FrameHit::Body);
        }
        if w >= CONTROLS_W + 3 {
            // controls end one cell before the right corner
            let start = x0 + w - 1 - CONTROLS_W;
            match p.x - start {
                0..=2 => return Some(FrameHit::Minimize),
                3..=5 => return Some(FrameHit::Close),
                _ => {}
            }
        }
        Some(FrameHit::TitleBar)
    }

    pub fn pointer_down(&mut self, pointer: Point, hit: FrameHit) -> FrameRequest {
        match hit {
            FrameHit::TitleBar => {
                self.drag = DragState::Dragging {
                    offset: pointer - self.position,
                };
                FrameRequest::Focus
            }
            FrameHit::Body => FrameRequest::Focus,
            FrameHit::Minimize => FrameRequest::Minimize,
            FrameHit::Close => FrameRequest::Close,
        }
    }

    /// Returns whether the displayed position changed.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let DragState::Dragging { offset } = self.drag else {
            return false;
        };
        let next = pointer - offset;
        let changed = next != self.position;
        self.position = next;
        changed
    }

    /// End the drag, yielding the frozen position to commit.
    pub fn pointer_up(&mut self) -> Option<Point> {
        match self.drag {
            DragState::Dragging { .. } => {
                self.drag = DragState::Idle;
                Some(self.position)
            }
            DragState::Idle => None,
        }
    }
}
