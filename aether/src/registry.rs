//! Window registry: one descriptor per known app, plus the focused id.
//!
//! Every operation takes `&self` and returns a new registry. Unknown ids are a
//! silent no-op. Operations never reorder the list and only touch the fields
//! they document.

/// Stacking value of the focused window.
pub const FRONT_Z: i32 = 100;
/// Stacking value of every other window after a focus change.
pub const BASELINE_Z: i32 = 1;

/// Fallback position for a descriptor without usable geometry.
pub const DEFAULT_POSITION: Point = Point { x: 50, y: 50 };
/// Fallback size for a descriptor without usable geometry.
pub const DEFAULT_SIZE: Size = Size { w: 400, h: 300 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: u16,
    pub h: u16,
}

impl Size {
    pub const fn new(w: u16, h: u16) -> Self {
        Self { w, h }
    }

    fn is_valid(self) -> bool {
        self.w > 0 && self.h > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    id: String,
    pub title: String,
    pub is_open: bool,
    pub is_minimized: bool,
    pub z_index: i32,
    pub position: Option<Point>,
    pub size: Option<Size>,
}

impl WindowDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_open: false,
            is_minimized: false,
            z_index: BASELINE_Z,
            position: None,
            size: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Open and not minimized.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }

    /// Stored geometry, or the fallback default when absent or zero-sized.
    pub fn geometry(&self) -> (Point, Size) {
        match (self.position, self.size) {
            (Some(p), Some(s)) if s.is_valid() => (p, s),
            _ => (DEFAULT_POSITION, DEFAULT_SIZE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    windows: Vec<WindowDescriptor>,
    focused: Option<String>,
}

impl Registry {
    /// Build from descriptors. Later duplicates of an id are dropped.
    pub fn new(descriptors: impl IntoIterator<Item = WindowDescriptor>) -> Self {
        let mut windows: Vec<WindowDescriptor> = Vec::new();
        for d in descriptors {
            if windows.iter().all(|w| w.id != d.id) {
                windows.push(d);
            }
        }
        Self {
            windows,
            focused: None,
        }
    }

    /// Mark `id` as focused without touching stacking. Used for the initial layout.
    pub fn with_focus(mut self, id: &str) -> Self {
        if self.get(id).is_some() {
            self.focused = Some(id.to_string());
        }
        self
    }

    pub fn windows(&self) -> &[WindowDescriptor] {
        &self.windows
    }

    pub fn get(&self, id: &str) -> Option<&WindowDescriptor> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused.as_deref() == Some(id)
    }

    /// Visible windows back to front: ascending z, list order breaking ties.
    pub fn stacking_order(&self) -> Vec<&WindowDescriptor> {
        let mut v: Vec<&WindowDescriptor> = self.windows.iter().filter(|w| w.is_visible()).collect();
        v.sort_by_key(|w| w.z_index);
        v
    }

    fn map_one(&self, id: &str, f: impl Fn(&mut WindowDescriptor)) -> Self {
        let windows = self
            .windows
            .iter()
            .map(|w| {
                let mut w = w.clone();
                if w.id == id {
                    f(&mut w);
                }
                w
            })
            .collect();
        Self {
            windows,
            focused: self.focused.clone(),
        }
    }

    pub fn open(&self, id: &str) -> Self {
        self.map_one(id, |w| {
            w.is_open = true;
            w.is_minimized = false;
        })
    }

    pub fn close(&self, id: &str) -> Self {
        self.map_one(id, |w| w.is_open = false)
    }

    pub fn minimize(&self, id: &str) -> Self {
        self.map_one(id, |w| w.is_minimized = true)
    }

    /// Raise `id` to the front and drop everything else to the baseline tier.
    pub fn focus(&self, id: &str) -> Self {
        if self.get(id).is_none() {
            return self.clone();
        }
        let windows = self
            .windows
            .iter()
            .map(|w| {
                let mut w = w.clone();
                if w.id == id {
                    w.z_index = FRONT_Z;
                    w.is_minimized = false;
                } else {
                    w.z_index = BASELINE_Z;
                }
                w
            })
            .collect();
        Self {
            windows,
            focused: Some(id.to_string()),
        }
    }

    /// Store a frame's frozen drag position, together with the size the frame
    /// was drawn at, so a window on fallback geometry keeps its on-screen size.
    pub fn commit_position(&self, id: &str, pos: Point, drawn: Size) -> Self {
        self.map_one(id, |w| {
            w.position = Some(pos);
            w.size = Some(drawn);
        })
    }

    /// Next visible window after the focused one, in list order.
    pub fn next_visible(&self) -> Option<&str> {
        let visible: Vec<&WindowDescriptor> = self.windows.iter().filter(|w| w.is_visible()).collect();
        if visible.is_empty() {
            return None;
        }
        let cur = self
            .focused
            .as_deref()
            .and_then(|f| visible.iter().position(|w| w.id == f));
        let next = match cur {
            Some(i) => (i + 1) % visible.len(),
            None => 0,
        };
        Some(visible[next].id.as_str())
    }
}
