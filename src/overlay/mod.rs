//! Overlay window: lifecycle state machine, window seams, Tauri host.

pub mod host;
pub mod lifecycle;
pub mod tauri_host;
pub mod timers;


pub use host::{FocusOwner, OverlayWindow, WindowGeneration, WindowHost};
pub use lifecycle::{OverlayLifecycle, OverlayState, ShownListeners, Subscription};
pub use tauri_host::TauriWindowHost;
pub use timers::{Clock, Scheduler, SystemClock, TimerId, TimerTask};
