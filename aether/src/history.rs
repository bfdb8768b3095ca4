//! Small utilities to manage bounded history buffers for the log and chart panels.

use std::collections::VecDeque;

/// Lines kept by the kernel log panel.
pub const LOG_CAPACITY: usize = 50;
/// Points kept by the memory chart.
pub const HISTORY_CAPACITY: usize = 20;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// Tail of kernel log lines, oldest first
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    cap: usize,
}

impl LogBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        push_capped(&mut self.lines, line.into(), self.cap);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPoint {
    // wall-clock label, HH:MM:SS
    pub time: String,
    pub value: u64,
}

// Rolling series for the memory chart
#[derive(Debug, Clone)]
pub struct HistorySeries {
    points: VecDeque<HistoryPoint>,
    cap: usize,
}

impl HistorySeries {
    pub fn new(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, time: impl Into<String>, value: u64) {
        let p = HistoryPoint {
            time: time.into(),
            value,
        };
        push_capped(&mut self.points, p, self.cap);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = &HistoryPoint> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
