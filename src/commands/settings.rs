//! Settings commands.

use tauri::{command, AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use crate::app::SharedNotifier;
use crate::config::{AppSettings, SettingsPatch, SettingsService};
use crate::controller::{ControllerHandle, APP_TITLE};
use crate::error::MdCaptureResult;

#[command]
pub fn get_settings(settings: State<'_, SettingsService>) -> AppSettings {
    settings.get_settings()
}

/// Persist a partial update and rebind the hotkey to the saved values.
#[command]
pub fn save_settings(
    patch: SettingsPatch,
    settings: State<'_, SettingsService>,
    controller: State<'_, ControllerHandle>,
    notifier: State<'_, SharedNotifier>,
) -> MdCaptureResult<AppSettings> {
    let saved = settings.save_settings(&patch).map_err(|e| {
        log::warn!("[SETTINGS] Save rejected: {}", e);
        notifier.notify(APP_TITLE, "Failed to save settings");
        e
    })?;

    controller.settings_saved(saved.hotkey_config());
    Ok(saved)
}

/// Native folder picker. `None` when the user cancels.
#[command]
pub async fn select_folder(app: AppHandle) -> Option<String> {
    app.dialog()
        .file()
        .set_title("Select Save Folder")
        .blocking_pick_folder()
        .map(|folder| folder.to_string())
}
