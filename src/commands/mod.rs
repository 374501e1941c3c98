//! IPC commands invoked from the overlay and settings pages.

pub mod app;
pub mod file;
pub mod logging;
pub mod notification;
pub mod overlay;
pub mod settings;
