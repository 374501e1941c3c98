use tauri::{command, AppHandle};

/// Application version from the package metadata.
#[command]
pub fn get_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}
