//! Global hotkey: accelerator builder, registry and the OS backend.

pub mod accelerator;
pub mod global_shortcut;
pub mod registry;

pub use accelerator::{build, Accelerator, HotkeyConfig, KeyToken, Modifier};
pub use global_shortcut::GlobalShortcutBackend;
pub use registry::{HotkeyRegistry, ShortcutBackend, SHOW_OVERLAY_ID};
