//! Application configuration.
//!
//! - `AppSettings`: persisted user preferences (save folder, hotkey, filename template)
//! - `SettingsService`: owned access to the settings store, managed by Tauri
//! - `OverlayTiming`: overlay focus and blur-guard delays

pub mod app;
pub mod settings;
pub mod timing;

pub use app::{AppSettings, SettingsPatch};
pub use settings::{SettingsBackend, SettingsService, StoreBackend};
pub use timing::OverlayTiming;
