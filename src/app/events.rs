//! Run-loop event handling.
//!
//! Exit requests are held back until the controller has released the hotkey,
//! the tray and the windows; the controller then re-issues the exit.

use std::sync::atomic::{AtomicU8, Ordering};

use tauri::{AppHandle, Manager, RunEvent};

use crate::controller::ControllerHandle;

const EXIT_IDLE: u8 = 0;
const EXIT_SHUTTING_DOWN: u8 = 1;
const EXIT_READY: u8 = 2;

/// Tracks the exit handshake with the controller.
#[derive(Default)]
pub struct ExitGate {
    state: AtomicU8,
}

impl ExitGate {
    /// Claim the shutdown. Only the first caller gets `true`.
    pub fn begin(&self) -> bool {
        self.state
            .compare_exchange(EXIT_IDLE, EXIT_SHUTTING_DOWN, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish(&self) {
        self.state.store(EXIT_READY, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::SeqCst) == EXIT_READY
    }
}

/// Handle run-loop events. Called from the Tauri `run` callback.
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    let RunEvent::ExitRequested { code, api, .. } = event else {
        return;
    };

    // Last window closed: keep living in the tray.
    let Some(code) = code else {
        log::info!("[APP] All windows closed, keeping app running in tray");
        api.prevent_exit();
        return;
    };

    let gate = app.state::<ExitGate>();
    if gate.is_ready() {
        log::info!("[APP] Exiting");
        return;
    }

    api.prevent_exit();
    if !gate.begin() {
        return;
    }

    log::info!("[APP] Exit requested, cleaning up...");
    let done_app = app.clone();
    let controller = app.state::<ControllerHandle>();
    if !controller.shutdown(Box::new(move || finish_exit(&done_app, code))) {
        finish_exit(app, code);
    }
}

fn finish_exit(app: &AppHandle, code: i32) {
    app.state::<ExitGate>().finish();
    app.exit(code);
}
