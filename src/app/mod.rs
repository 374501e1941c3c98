//! Application lifecycle and platform integration.
//!
//! - `tray`: System tray setup and menu handling
//! - `events`: Run-loop event handling (exit and shutdown sequencing)
//! - `notify`: Best-effort desktop notifications
//! - `panic`: Panic reporting

pub mod events;
pub mod notify;
pub mod panic;
pub mod tray;

pub use events::ExitGate;
pub use notify::{Notifier, SharedNotifier, TauriNotifier};
pub use tray::{TauriTray, TrayControl};
