//! Note saving command.

use tauri::{command, State};

use crate::app::SharedNotifier;
use crate::controller::APP_TITLE;
use crate::config::SettingsService;
use crate::error::MdCaptureResult;
use crate::notes;

/// Write a note to the save folder and return the filename used.
///
/// Failures are reported to the user as a notification as well as returned.
#[command]
pub async fn save_markdown(
    content: String,
    filename: Option<String>,
    settings: State<'_, SettingsService>,
    notifier: State<'_, SharedNotifier>,
) -> MdCaptureResult<String> {
    let current = settings.get_settings();

    notes::save_markdown(&current, &content, filename.as_deref()).map_err(|e| {
        log::error!("[NOTES] Failed to save markdown: {}", e);
        notifier.notify(APP_TITLE, "Failed to save markdown file");
        e
    })
}
