//! Static application catalog and the initial window layout.

use crate::registry::{Point, Registry, Size, WindowDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppEntry {
    pub id: &'static str,
    pub label: &'static str,
}

pub const KLOG: &str = "klog";
pub const MONITOR: &str = "monitor";
pub const EXPLORER: &str = "explorer";

/// Dock order.
pub const APPS: [AppEntry; 3] = [
    AppEntry {
        id: KLOG,
        label: "KLOG",
    },
    AppEntry {
        id: MONITOR,
        label: "MONITOR",
    },
    AppEntry {
        id: EXPLORER,
        label: "EXPLORER",
    },
];

/// One descriptor per catalog entry; log and monitor start open, log focused.
pub fn initial_registry() -> Registry {
    let descriptors = APPS.iter().map(|app| {
        let mut d = WindowDescriptor::new(app.id, title_for(app.id));
        match app.id {
            KLOG => {
                d.is_open = true;
                d.z_index = 1;
                d.position = Some(Point::new(2, 1));
                d.size = Some(Size::new(60, 18));
            }
            MONITOR => {
                d.is_open = true;
                d.z_index = 2;
                d.position = Some(Point::new(64, 1));
                d.size = Some(Size::new(46, 14));
            }
            _ => {
                d.position = Some(Point::new(30, 8));
                d.size = Some(Size::new(40, 10));
            }
        }
        d
    });
    Registry::new(descriptors).with_focus(KLOG)
}

fn title_for(id: &str) -> &'static str {
    match id {
        KLOG => "KERNEL LOG STREAM",
        MONITOR => "AETHER MONITOR",
        EXPLORER => "DEVICE EXPLORER",
        _ => "",
    }
}
