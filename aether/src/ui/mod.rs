//! UI module root: exposes drawing functions for the shell's regions and windows.

pub mod dock;
pub mod layout;
pub mod panels;
pub mod status;
pub mod theme;
pub mod util;
pub mod window;
