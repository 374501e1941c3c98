//! Capture session controller.
//!
//! Single owner of the overlay lifecycle and the hotkey registry. Every
//! trigger (hotkey, tray, second instance, IPC command, window event, timer
//! expiry) arrives as a [`ControllerEvent`] and is handled sequentially, so
//! no state here needs locking.
//!
//! ## Architecture
//!
//! ```text
//! controller/
//!   mod.rs      - CaptureController and ControllerEvent
//!   runtime.rs  - Event channel, Tokio-backed scheduler, event loop
//! ```

pub mod runtime;


pub use runtime::{ControllerHandle, ControllerInbox, TokioScheduler};

use std::sync::Arc;

use crate::app::notify::Notifier;
use crate::app::tray::{tooltip_for, TrayControl};
use crate::hotkey::{self, HotkeyConfig, HotkeyRegistry, ShortcutBackend, SHOW_OVERLAY_ID};
use crate::overlay::{
    OverlayLifecycle, Subscription, TimerId, TimerTask, WindowGeneration, WindowHost,
};

pub const APP_TITLE: &str = "Markdown Capture";

/// Callback run once the shutdown sequence has finished.
pub type ShutdownDone = Box<dyn FnOnce() + Send>;

/// Work items delivered to the controller.
pub enum ControllerEvent {
    /// A registered global shortcut fired.
    HotkeyFired { id: String },
    /// The tray icon was clicked, or "Show Overlay" picked from its menu.
    TrayActivated,
    /// Another process of this app was launched.
    SecondInstance,
    /// Settings were persisted; the hotkey must follow.
    SettingsSaved(HotkeyConfig),
    ShowOverlay,
    HideOverlay,
    ShowSettings,
    HideSettings,
    OverlayReady { generation: WindowGeneration },
    OverlayBlurred { generation: WindowGeneration },
    OverlayClosed { generation: WindowGeneration },
    TimerFired { id: TimerId, task: TimerTask },
    Shutdown { on_done: Option<ShutdownDone> },
}

impl ControllerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerEvent::HotkeyFired { .. } => "hotkey-fired",
            ControllerEvent::TrayActivated => "tray-activated",
            ControllerEvent::SecondInstance => "second-instance",
            ControllerEvent::SettingsSaved(_) => "settings-saved",
            ControllerEvent::ShowOverlay => "show-overlay",
            ControllerEvent::HideOverlay => "hide-overlay",
            ControllerEvent::ShowSettings => "show-settings",
            ControllerEvent::HideSettings => "hide-settings",
            ControllerEvent::OverlayReady { .. } => "overlay-ready",
            ControllerEvent::OverlayBlurred { .. } => "overlay-blurred",
            ControllerEvent::OverlayClosed { .. } => "overlay-closed",
            ControllerEvent::TimerFired { .. } => "timer-fired",
            ControllerEvent::Shutdown { .. } => "shutdown",
        }
    }
}

impl std::fmt::Debug for ControllerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct CaptureController<H: WindowHost, B: ShortcutBackend> {
    lifecycle: OverlayLifecycle<H>,
    registry: HotkeyRegistry<B>,
    tray: Option<Box<dyn TrayControl>>,
    notifier: Arc<dyn Notifier>,
    shut_down: bool,
}

impl<H: WindowHost, B: ShortcutBackend> CaptureController<H, B> {
    pub fn new(
        lifecycle: OverlayLifecycle<H>,
        registry: HotkeyRegistry<B>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            lifecycle,
            registry,
            tray: None,
            notifier,
            shut_down: false,
        }
    }

    pub fn attach_tray(&mut self, tray: Box<dyn TrayControl>) {
        self.tray = Some(tray);
    }

    pub fn lifecycle(&self) -> &OverlayLifecycle<H> {
        &self.lifecycle
    }

    pub fn registry(&self) -> &HotkeyRegistry<B> {
        &self.registry
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Bind the configured hotkey at startup.
    pub fn start(&mut self, config: &HotkeyConfig) -> bool {
        self.apply_hotkey(config)
    }

    pub fn handle(&mut self, event: ControllerEvent) -> Flow {
        if self.shut_down {
            if let ControllerEvent::Shutdown { on_done: Some(done) } = event {
                done();
            }
            return Flow::Stop;
        }

        log::debug!("[CONTROLLER] Handling {}", event.name());

        match event {
            ControllerEvent::HotkeyFired { id } => {
                if id == SHOW_OVERLAY_ID {
                    log::info!("[CONTROLLER] Hotkey pressed - showing overlay");
                    self.show_overlay();
                } else {
                    log::warn!("[CONTROLLER] Ignoring unknown hotkey id {}", id);
                }
            },
            ControllerEvent::TrayActivated => self.show_overlay(),
            ControllerEvent::SecondInstance => {
                log::info!("[CONTROLLER] Second instance detected, focusing existing overlay");
                self.show_overlay();
            },
            ControllerEvent::SettingsSaved(config) => {
                self.settings_saved(&config);
            },
            ControllerEvent::ShowOverlay => self.show_overlay(),
            ControllerEvent::HideOverlay => self.hide_overlay(),
            ControllerEvent::ShowSettings => self.show_settings_panel(),
            ControllerEvent::HideSettings => self.hide_settings_panel(),
            ControllerEvent::OverlayReady { generation } => self.lifecycle.on_ready(generation),
            ControllerEvent::OverlayBlurred { generation } => self.lifecycle.on_blur(generation),
            ControllerEvent::OverlayClosed { generation } => self.lifecycle.on_closed(generation),
            ControllerEvent::TimerFired { id, task } => self.lifecycle.on_timer(id, task),
            ControllerEvent::Shutdown { on_done } => {
                self.shutdown();
                if let Some(done) = on_done {
                    done();
                }
                return Flow::Stop;
            },
        }

        Flow::Continue
    }

    pub fn show_overlay(&mut self) {
        self.lifecycle.show();
    }

    pub fn hide_overlay(&mut self) {
        self.lifecycle.hide();
    }

    pub fn show_settings_panel(&mut self) {
        if let Err(e) = self.lifecycle.host_mut().show_settings() {
            log::error!("[CONTROLLER] Failed to show settings window: {}", e);
        }
    }

    pub fn hide_settings_panel(&mut self) {
        if let Err(e) = self.lifecycle.host_mut().hide_settings() {
            log::error!("[CONTROLLER] Failed to hide settings window: {}", e);
        }
    }

    /// Register a callback fired every time the overlay becomes visible.
    pub fn on_overlay_shown(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.lifecycle.listeners().subscribe(callback)
    }

    /// Rebuild the hotkey from freshly saved settings.
    pub fn settings_saved(&mut self, config: &HotkeyConfig) -> bool {
        log::info!("[CONTROLLER] Settings saved, rebuilding hotkey");
        self.apply_hotkey(config)
    }

    /// Release everything in a fixed order: hotkeys, tray, windows.
    /// Idempotent; components that were never set up are skipped.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::info!("[CONTROLLER] Shutting down");

        self.registry.unregister_all();
        if let Some(tray) = self.tray.take() {
            tray.destroy();
        }
        self.lifecycle.close_all();
    }

    fn apply_hotkey(&mut self, config: &HotkeyConfig) -> bool {
        let bound = self.registry.rebuild(config);
        let accelerator = self.registry.accelerator(SHOW_OVERLAY_ID).cloned();

        if let Some(tray) = &self.tray {
            tray.set_tooltip(&tooltip_for(accelerator.as_ref()));
        }

        if !bound {
            let shown = hotkey::build(config)
                .map(|a| a.to_string())
                .unwrap_or_else(|_| format!("key code {}", config.key_code));
            self.notifier.notify(
                APP_TITLE,
                &format!(
                    "Hotkey {} is unavailable. Pick another one in Settings.",
                    shown
                ),
            );
        }
        bound
    }
}
