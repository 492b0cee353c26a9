// src/display/mod.rs
//! Display modules for different interfaces

pub mod terminal;

#[cfg(feature = "gui")]
pub mod gui;

/// Check if a graphical session is available
#[cfg(feature = "gui")]
pub fn should_use_gui() -> bool {
    cfg!(any(windows, target_os = "macos"))
        || std::env::var("DISPLAY").is_ok()
        || std::env::var("WAYLAND_DISPLAY").is_ok()
}

#[cfg(not(feature = "gui"))]
pub fn should_use_gui() -> bool {
    false
}
