//! Small UI helpers: human-readable sizes, truncation, pointer hit checks.

use ratatui::layout::Rect;

pub fn human(b: u64) -> String {
    const K: f64 = 1024.0;
    let b = b as f64;
    if b < K { return format!("{b:.0}B"); }
    let kb = b / K;
    if kb < K { return format!("{kb:.1}KB"); }
    let mb = kb / K;
    if mb < K { return format!("{mb:.1}MB"); }
    let gb = mb / K;
    format!("{gb:.2}GB")
}

pub fn truncate_end(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    if max <= 3 { return ".".repeat(max); }
    let keep: String = s.chars().take(max - 3).collect();
    format!("{keep}...")
}

pub fn point_in_rect(x: u16, y: u16, r: Rect) -> bool {
    x >= r.x && x < r.x.saturating_add(r.width) && y >= r.y && y < r.y.saturating_add(r.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_sizes() {
        assert_eq!(human(512), "512B");
        assert_eq!(human(8192 * 1024), "8.0MB");
    }

    #[test]
    fn truncate_end_keeps_short_strings() {
        assert_eq!(truncate_end("KLOG", 10), "KLOG");
        assert_eq!(truncate_end("KERNEL LOG STREAM", 9), "KERNEL...");
    }
}
