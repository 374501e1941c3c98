//! Tauri-backed overlay and settings windows.

use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent};

use super::host::{FocusOwner, OverlayWindow, WindowGeneration, WindowHost};
use crate::controller::{ControllerEvent, ControllerHandle, APP_TITLE};
use crate::error::{MdCaptureError, MdCaptureResult};

/// Overlay window label
pub(crate) const OVERLAY_LABEL: &str = "overlay";

/// Settings window label
pub(crate) const SETTINGS_LABEL: &str = "settings";

/// Event sent to the overlay content each time it is shown.
pub const SHOW_OVERLAY_EVENT: &str = "show-overlay";

/// Page bundled for the overlay content.
const OVERLAY_PAGE: &str = "index.html";

const OVERLAY_WIDTH: f64 = 600.0;
const OVERLAY_HEIGHT: f64 = 400.0;

const SETTINGS_MAX_WIDTH: f64 = 800.0;
const SETTINGS_MAX_HEIGHT: f64 = 600.0;
const SETTINGS_SCREEN_MARGIN: f64 = 100.0;

pub struct TauriWindowHost {
    app: AppHandle,
    events: ControllerHandle,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle, events: ControllerHandle) -> Self {
        Self { app, events }
    }

    /// Settings window size clamped to the primary monitor.
    fn settings_size(&self) -> (f64, f64) {
        let work_area = self
            .app
            .primary_monitor()
            .ok()
            .flatten()
            .map(|m| m.size().to_logical::<f64>(m.scale_factor()));

        match work_area {
            Some(size) => (
                SETTINGS_MAX_WIDTH.min(size.width - SETTINGS_SCREEN_MARGIN),
                SETTINGS_MAX_HEIGHT.min(size.height - SETTINGS_SCREEN_MARGIN),
            ),
            None => (SETTINGS_MAX_WIDTH, SETTINGS_MAX_HEIGHT),
        }
    }
}

/// An overlay whose page is missing from the bundle would stay blank.
fn require_page<T>(page: &str, asset: Option<T>) -> MdCaptureResult<T> {
    asset.ok_or_else(|| MdCaptureError::WindowError(format!("overlay page {} not found", page)))
}

pub struct TauriOverlay {
    window: WebviewWindow,
}

impl OverlayWindow for TauriOverlay {
    fn load_content(&self) -> MdCaptureResult<()> {
        let asset = self
            .window
            .app_handle()
            .asset_resolver()
            .get(OVERLAY_PAGE.to_string());
        require_page(OVERLAY_PAGE, asset)?;
        log::debug!("[OVERLAY] Resolved {}", OVERLAY_PAGE);
        Ok(())
    }

    fn show(&self) -> MdCaptureResult<()> {
        Ok(self.window.show()?)
    }

    fn hide(&self) -> MdCaptureResult<()> {
        Ok(self.window.hide()?)
    }

    fn focus(&self) -> MdCaptureResult<()> {
        Ok(self.window.set_focus()?)
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused().unwrap_or(false)
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible().unwrap_or(false)
    }

    fn notify_shown(&self) -> MdCaptureResult<()> {
        Ok(self.window.emit(SHOW_OVERLAY_EVENT, ())?)
    }

    fn close(&self) -> MdCaptureResult<()> {
        Ok(self.window.close()?)
    }

    fn destroy(&self) -> MdCaptureResult<()> {
        Ok(self.window.destroy()?)
    }
}

impl WindowHost for TauriWindowHost {
    type Overlay = TauriOverlay;

    fn create_overlay(&mut self, generation: WindowGeneration) -> MdCaptureResult<TauriOverlay> {
        let url = WebviewUrl::App(OVERLAY_PAGE.into());
        let ready = self.events.clone();

        // Borderless, always on top, out of the taskbar. Translucency comes
        // from the page background.
        let window = WebviewWindowBuilder::new(&self.app, OVERLAY_LABEL, url)
            .title(APP_TITLE)
            .inner_size(OVERLAY_WIDTH, OVERLAY_HEIGHT)
            .decorations(false)
            .always_on_top(true)
            .skip_taskbar(true)
            .resizable(false)
            .maximizable(false)
            .center()
            .visible(false)
            .focused(false)
            .on_page_load(move |_window, payload| {
                if matches!(payload.event(), PageLoadEvent::Finished) {
                    ready.send(ControllerEvent::OverlayReady { generation });
                }
            })
            .build()
            .map_err(|e| MdCaptureError::WindowError(format!("create overlay: {}", e)))?;

        let events = self.events.clone();
        window.on_window_event(move |event| match event {
            WindowEvent::Focused(false) => {
                events.send(ControllerEvent::OverlayBlurred { generation });
            },
            WindowEvent::Destroyed => {
                events.send(ControllerEvent::OverlayClosed { generation });
            },
            _ => {},
        });

        Ok(TauriOverlay { window })
    }

    #[cfg(target_os = "windows")]
    fn focus_owner(&self, overlay: &TauriOverlay) -> FocusOwner {
        use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

        let foreground = unsafe { GetForegroundWindow() };
        if foreground.0.is_null() {
            return FocusOwner::Nobody;
        }

        match overlay.window.hwnd() {
            Ok(hwnd) if hwnd.0 as isize == foreground.0 as isize => FocusOwner::Overlay,
            Ok(_) => FocusOwner::Other,
            Err(e) => {
                log::warn!("[OVERLAY] Failed to get HWND: {}", e);
                FocusOwner::Nobody
            },
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn focus_owner(&self, _overlay: &TauriOverlay) -> FocusOwner {
        // Only this app's windows are observable here.
        let focused = self
            .app
            .webview_windows()
            .into_iter()
            .find(|(_, window)| window.is_focused().unwrap_or(false))
            .map(|(label, _)| label);

        match focused.as_deref() {
            Some(OVERLAY_LABEL) => FocusOwner::Overlay,
            Some(_) => FocusOwner::Other,
            None => FocusOwner::Nobody,
        }
    }

    fn show_settings(&mut self) -> MdCaptureResult<()> {
        if let Some(window) = self.app.get_webview_window(SETTINGS_LABEL) {
            window.show()?;
            window.set_focus()?;
            return Ok(());
        }

        let (width, height) = self.settings_size();
        let url = WebviewUrl::App("settings.html".into());

        WebviewWindowBuilder::new(&self.app, SETTINGS_LABEL, url)
            .title(format!("{} Settings", APP_TITLE))
            .inner_size(width, height)
            .resizable(true)
            .decorations(true)
            .always_on_top(false)
            .skip_taskbar(false)
            .center()
            .visible(true)
            .focused(true)
            .build()
            .map_err(|e| MdCaptureError::WindowError(format!("create settings window: {}", e)))?;

        log::info!("[WINDOW] Settings window created and shown");
        Ok(())
    }

    fn hide_settings(&mut self) -> MdCaptureResult<()> {
        if let Some(window) = self.app.get_webview_window(SETTINGS_LABEL) {
            window.hide()?;
            log::info!("[WINDOW] Settings window hidden");
        }
        Ok(())
    }

    fn close_settings(&mut self) -> MdCaptureResult<()> {
        if let Some(window) = self.app.get_webview_window(SETTINGS_LABEL) {
            window.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_page_passes_resolved_asset() {
        assert_eq!(require_page(OVERLAY_PAGE, Some(7)).unwrap(), 7);
    }

    #[test]
    fn test_require_page_missing_is_window_error() {
        let err = require_page::<()>(OVERLAY_PAGE, None).unwrap_err();
        assert!(matches!(err, MdCaptureError::WindowError(_)));
        assert!(err.to_string().contains("index.html"));
    }
}
