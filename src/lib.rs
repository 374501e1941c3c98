use std::sync::Arc;

use tauri::{App, Manager};

pub mod app;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod hotkey;
pub mod notes;
pub mod overlay;

#[cfg(test)]
mod testing;

use app::{ExitGate, SharedNotifier, TauriNotifier};
use config::{OverlayTiming, SettingsService, StoreBackend};
use controller::{CaptureController, ControllerEvent, ControllerHandle, ControllerInbox, TokioScheduler};
use hotkey::{GlobalShortcutBackend, HotkeyRegistry};
use overlay::{OverlayLifecycle, SystemClock, TauriWindowHost};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let (events, inbox) = controller::runtime::channel();
    let second_instance = events.clone();

    // Single-instance must be the first plugin registered.
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(move |_app, _args, _cwd| {
            log::info!("[APP] Second instance launched, showing overlay");
            second_instance.send(ControllerEvent::SecondInstance);
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .invoke_handler(tauri::generate_handler![
            // Window commands
            commands::overlay::show_overlay,
            commands::overlay::hide_overlay,
            commands::overlay::show_settings,
            commands::overlay::hide_settings,
            // Settings commands
            commands::settings::get_settings,
            commands::settings::save_settings,
            commands::settings::select_folder,
            // Note commands
            commands::file::save_markdown,
            // App commands
            commands::notification::show_notification,
            commands::app::get_version,
            // Logging commands
            commands::logging::write_log,
            commands::logging::write_logs,
            commands::logging::get_log_dir,
        ])
        .setup(move |app| {
            setup(app, events, inbox)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::events::handle_run_event);
}

fn setup(
    app: &mut App,
    events: ControllerHandle,
    inbox: ControllerInbox,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = commands::logging::init_logging(app.handle()) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log::info!("[APP] Starting Markdown Capture v{}", app.package_info().version);

    // Background utility: no dock icon on macOS.
    #[cfg(target_os = "macos")]
    app.set_activation_policy(tauri::ActivationPolicy::Accessory);

    let notifier: SharedNotifier = Arc::new(TauriNotifier::new(app.handle().clone()));
    app::panic::install_panic_hook(Arc::clone(&notifier));

    let settings = SettingsService::new(StoreBackend::new(app.handle().clone()));
    let initial = settings.get_settings();
    log::info!(
        "[APP] Save folder: {}, template: {}",
        initial.save_folder,
        initial.filename_template
    );

    let host = TauriWindowHost::new(app.handle().clone(), events.clone());
    let lifecycle = OverlayLifecycle::new(
        host,
        Arc::new(TokioScheduler::new(events.clone())),
        Arc::new(SystemClock),
        OverlayTiming::default(),
    );
    let registry = HotkeyRegistry::new(GlobalShortcutBackend::new(
        app.handle().clone(),
        events.clone(),
    ));

    let mut capture = CaptureController::new(lifecycle, registry, Arc::clone(&notifier));
    capture.attach_tray(Box::new(app::tray::setup_system_tray(app, events.clone())?));

    app.manage(settings);
    app.manage(notifier);
    app.manage(events);
    app.manage(ExitGate::default());

    tauri::async_runtime::spawn(controller::runtime::run(
        capture,
        inbox,
        initial.hotkey_config(),
    ));

    Ok(())
}
