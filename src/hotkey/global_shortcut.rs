//! `tauri-plugin-global-shortcut` backed hotkey binding.

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use super::accelerator::Accelerator;
use super::registry::ShortcutBackend;
use crate::controller::{ControllerEvent, ControllerHandle};
use crate::error::{MdCaptureError, MdCaptureResult};

pub struct GlobalShortcutBackend {
    app: AppHandle,
    events: ControllerHandle,
}

impl GlobalShortcutBackend {
    pub fn new(app: AppHandle, events: ControllerHandle) -> Self {
        Self { app, events }
    }
}

fn parse_shortcut(accelerator: &Accelerator) -> MdCaptureResult<Shortcut> {
    accelerator
        .to_shortcut_string()
        .parse::<Shortcut>()
        .map_err(|e| MdCaptureError::InvalidHotkey(format!("{}: {}", accelerator, e)))
}

impl ShortcutBackend for GlobalShortcutBackend {
    fn register(&mut self, id: &str, accelerator: &Accelerator) -> MdCaptureResult<()> {
        let shortcut = parse_shortcut(accelerator)?;
        let events = self.events.clone();
        let id = id.to_string();

        self.app
            .global_shortcut()
            .on_shortcut(shortcut, move |_app, _shortcut, event| {
                // Fire on press only; release would double-toggle.
                if event.state == ShortcutState::Pressed {
                    log::debug!("[HOTKEY] {} pressed", id);
                    events.send(ControllerEvent::HotkeyFired { id: id.clone() });
                }
            })
            .map_err(|e| MdCaptureError::HotkeyUnavailable {
                accelerator: accelerator.to_string(),
                reason: e.to_string(),
            })
    }

    fn unregister(&mut self, accelerator: &Accelerator) -> MdCaptureResult<()> {
        let shortcut = parse_shortcut(accelerator)?;
        self.app
            .global_shortcut()
            .unregister(shortcut)
            .map_err(|e| MdCaptureError::Other(format!("unregister {}: {}", accelerator, e)))
    }
}
