use tauri::{command, State};

use crate::app::SharedNotifier;

#[command]
pub fn show_notification(title: String, body: String, notifier: State<'_, SharedNotifier>) {
    notifier.notify(&title, &body);
}
