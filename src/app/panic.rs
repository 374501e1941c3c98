//! Panic reporting.

use super::notify::SharedNotifier;
use crate::controller::APP_TITLE;

const PANIC_MESSAGE: &str = "An unexpected error occurred. The app will continue running.";

/// Log panics and surface them as a notification, then defer to the
/// previously installed hook.
pub fn install_panic_hook(notifier: SharedNotifier) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("[PANIC] {}", info);
        notifier.notify(APP_TITLE, PANIC_MESSAGE);
        previous(info);
    }));
}
