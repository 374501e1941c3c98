//! Best-effort desktop notifications.

use std::sync::Arc;

use tauri::AppHandle;
use tauri_plugin_notification::NotificationExt;

/// Fire-and-forget user notification. Implementations never fail outward.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

pub type SharedNotifier = Arc<dyn Notifier>;

pub struct TauriNotifier {
    app: AppHandle,
}

impl TauriNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Notifier for TauriNotifier {
    fn notify(&self, title: &str, body: &str) {
        match self.app.notification().builder().title(title).body(body).show() {
            Ok(()) => log::info!("[NOTIFY] Notification shown: {} - {}", title, body),
            Err(e) => log::warn!("[NOTIFY] Failed to show notification: {}", e),
        }
    }
}
