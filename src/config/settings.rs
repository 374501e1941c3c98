//! Settings persistence.
//!
//! `SettingsService` is the single owner of settings access. It is created at
//! startup and handed to Tauri as managed state; commands reach it through
//! `State<SettingsService>`.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tauri::{AppHandle, Wry};
use tauri_plugin_store::StoreExt;

use super::app::{AppSettings, SettingsPatch};
use crate::error::{MdCaptureError, MdCaptureResult};

/// Store file name under the app data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Flat key/value settings storage.
pub trait SettingsBackend: Send + Sync {
    /// Everything currently stored. Missing file means an empty record.
    fn load(&self) -> MdCaptureResult<Map<String, Value>>;

    /// Write `entries` and persist.
    fn save(&self, entries: Vec<(String, Value)>) -> MdCaptureResult<()>;
}

/// `tauri-plugin-store` backed settings.
pub struct StoreBackend {
    app: AppHandle<Wry>,
}

impl StoreBackend {
    pub fn new(app: AppHandle<Wry>) -> Self {
        Self { app }
    }
}

impl SettingsBackend for StoreBackend {
    fn load(&self) -> MdCaptureResult<Map<String, Value>> {
        let store = self
            .app
            .store(SETTINGS_FILE)
            .map_err(|e| MdCaptureError::SettingsStore(e.to_string()))?;

        Ok(store.entries().into_iter().collect())
    }

    fn save(&self, entries: Vec<(String, Value)>) -> MdCaptureResult<()> {
        let store = self
            .app
            .store(SETTINGS_FILE)
            .map_err(|e| MdCaptureError::SettingsStore(e.to_string()))?;

        for (key, value) in entries {
            store.set(key, value);
        }

        store
            .save()
            .map_err(|e| MdCaptureError::SettingsStore(e.to_string()))
    }
}

pub struct SettingsService {
    backend: Box<dyn SettingsBackend>,
    /// Serializes read-merge-write cycles.
    write_lock: Mutex<()>,
}

impl SettingsService {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Stored values merged over the defaults.
    ///
    /// Merged per key: a stored value that does not fit its field falls back
    /// to the default for that field alone. An unreadable store yields the
    /// defaults.
    pub fn get_settings(&self) -> AppSettings {
        let defaults = AppSettings::default();

        let stored = match self.backend.load() {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("[SETTINGS] Failed to read settings, using defaults: {}", e);
                return defaults;
            },
        };

        let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
            return defaults;
        };

        let keys: Vec<String> = merged.keys().cloned().collect();
        for key in keys {
            let Some(value) = stored.get(&key) else {
                continue;
            };

            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            if serde_json::from_value::<AppSettings>(Value::Object(candidate)).is_ok() {
                merged.insert(key, value.clone());
            } else {
                log::warn!("[SETTINGS] Ignoring invalid stored value for {}", key);
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
    }

    /// Validate the merged result, then persist the present fields.
    ///
    /// Returns the settings as they are after the save.
    pub fn save_settings(&self, patch: &SettingsPatch) -> MdCaptureResult<AppSettings> {
        let _guard = self.write_lock.lock();

        let mut settings = self.get_settings();
        patch.apply_to(&mut settings);
        settings.validate()?;

        if !patch.is_empty() {
            self.backend.save(patch.entries()?)?;
            log::info!("[SETTINGS] Settings saved");
        }

        Ok(settings)
    }

    pub fn update_save_folder(&self, folder: &str) -> MdCaptureResult<AppSettings> {
        self.save_settings(&SettingsPatch {
            save_folder: Some(folder.to_string()),
            ..SettingsPatch::default()
        })
    }

    pub fn update_hotkey(&self, modifiers: u32, key: u32) -> MdCaptureResult<AppSettings> {
        self.save_settings(&SettingsPatch {
            hotkey_modifiers: Some(modifiers),
            hotkey_key: Some(key),
            ..SettingsPatch::default()
        })
    }

    pub fn update_filename_template(&self, template: &str) -> MdCaptureResult<AppSettings> {
        self.save_settings(&SettingsPatch {
            filename_template: Some(template.to_string()),
            ..SettingsPatch::default()
        })
    }
}
