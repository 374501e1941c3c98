//! System tray setup and event handling.

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle,
};

use crate::controller::{ControllerEvent, ControllerHandle, APP_TITLE};
use crate::hotkey::Accelerator;

/// Tray icon id.
pub const TRAY_ID: &str = "main";

/// The parts of the tray the controller drives.
pub trait TrayControl: Send {
    fn set_tooltip(&self, text: &str);

    fn destroy(self: Box<Self>);
}

/// Tooltip text for the currently bound accelerator, if any.
pub fn tooltip_for(accelerator: Option<&Accelerator>) -> String {
    match accelerator {
        Some(accelerator) => format!(
            "{} - Press {} to capture notes",
            APP_TITLE, accelerator
        ),
        None => format!("{} - No hotkey bound", APP_TITLE),
    }
}

/// Tray handle looked up by id, so only the `AppHandle` crosses threads.
pub struct TauriTray {
    app: AppHandle,
}

impl TrayControl for TauriTray {
    fn set_tooltip(&self, text: &str) {
        match self.app.tray_by_id(TRAY_ID) {
            Some(tray) => {
                if let Err(e) = tray.set_tooltip(Some(text)) {
                    log::warn!("[TRAY] Failed to update tooltip: {}", e);
                }
            },
            None => log::debug!("[TRAY] No tray to update"),
        }
    }

    fn destroy(self: Box<Self>) {
        if self.app.remove_tray_by_id(TRAY_ID).is_some() {
            log::info!("[TRAY] Tray destroyed");
        }
    }
}

/// Set up the system tray with menu and event handlers.
pub fn setup_system_tray(
    app: &App,
    events: ControllerHandle,
) -> Result<TauriTray, Box<dyn std::error::Error>> {
    let show = MenuItem::with_id(app, "show_overlay", "Show Overlay", true, None::<&str>)?;
    let settings = MenuItem::with_id(app, "settings", "Settings", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, "quit", "Exit", true, None::<&str>)?;
    let separator = PredefinedMenuItem::separator(app)?;

    let menu = Menu::with_items(app, &[&show, &separator, &settings, &quit])?;

    // 32x32 is standard for system tray
    let tray_icon = Image::from_bytes(include_bytes!("../../icons/32x32.png"))?;

    let menu_events = events.clone();
    TrayIconBuilder::with_id(TRAY_ID)
        .icon(tray_icon)
        .tooltip(APP_TITLE)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "show_overlay" => {
                log::info!("[TRAY] Show overlay clicked");
                menu_events.send(ControllerEvent::TrayActivated);
            },
            "settings" => {
                log::info!("[TRAY] Settings clicked");
                menu_events.send(ControllerEvent::ShowSettings);
            },
            "quit" => {
                log::info!("[TRAY] Exit clicked");
                app.exit(0);
            },
            _ => {},
        })
        .on_tray_icon_event(move |_tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("[TRAY] Tray clicked");
                events.send(ControllerEvent::TrayActivated);
            }
        })
        .build(app)?;

    log::info!("[TRAY] Tray initialized");
    Ok(TauriTray {
        app: app.handle().clone(),
    })
}
