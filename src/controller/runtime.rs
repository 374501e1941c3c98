//! Event channel and loop driving the controller.
//!
//! OS callbacks, IPC commands and timers only ever *send* into the channel,
//! they never touch controller state directly. The main thread therefore
//! never waits on the controller, while the controller may freely call window
//! getters that round-trip through the main thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tauri::async_runtime::JoinHandle;
use tokio::sync::mpsc;

use super::{CaptureController, ControllerEvent, Flow, ShutdownDone};
use crate::hotkey::{HotkeyConfig, ShortcutBackend};
use crate::overlay::{Scheduler, TimerId, TimerTask, WindowHost};

/// Cloneable sender side of the controller channel.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

/// Receiver side, consumed by [`run`].
pub struct ControllerInbox {
    rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

pub fn channel() -> (ControllerHandle, ControllerInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ControllerHandle { tx }, ControllerInbox { rx })
}

impl ControllerHandle {
    /// Queue an event. Returns `false` once the controller has stopped.
    pub fn send(&self, event: ControllerEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                log::debug!("[CONTROLLER] Stopped, dropping {}", event.name());
                false
            },
        }
    }

    pub fn show_overlay(&self) {
        self.send(ControllerEvent::ShowOverlay);
    }

    pub fn hide_overlay(&self) {
        self.send(ControllerEvent::HideOverlay);
    }

    pub fn show_settings(&self) {
        self.send(ControllerEvent::ShowSettings);
    }

    pub fn hide_settings(&self) {
        self.send(ControllerEvent::HideSettings);
    }

    pub fn settings_saved(&self, config: HotkeyConfig) {
        self.send(ControllerEvent::SettingsSaved(config));
    }

    /// Ask for the shutdown sequence; `on_done` runs once it finished.
    /// Returns `false` (without running `on_done`) if the controller is gone.
    pub fn shutdown(&self, on_done: ShutdownDone) -> bool {
        self.send(ControllerEvent::Shutdown {
            on_done: Some(on_done),
        })
    }
}

impl ControllerInbox {
    pub async fn recv(&mut self) -> Option<ControllerEvent> {
        self.rx.recv().await
    }
}

/// Timers as spawned sleeps that post back into the controller channel.
pub struct TokioScheduler {
    events: ControllerHandle,
    next_id: AtomicU64,
    tasks: Arc<Mutex<HashMap<TimerId, JoinHandle<()>>>>,
}

impl TokioScheduler {
    pub fn new(events: ControllerHandle) -> Self {
        Self {
            events,
            next_id: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let events = self.events.clone();
        let tasks = Arc::clone(&self.tasks);

        // Held across spawn so the task cannot remove its entry before it exists.
        let mut pending = self.tasks.lock();
        let handle = tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            tasks.lock().remove(&id);
            events.send(ControllerEvent::TimerFired { id, task });
        });
        pending.insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self.tasks.lock().remove(&id) {
            handle.abort();
        }
    }
}

/// Drive the controller until shutdown or until every sender is gone.
pub async fn run<H, B>(
    mut controller: CaptureController<H, B>,
    mut inbox: ControllerInbox,
    initial: HotkeyConfig,
) where
    H: WindowHost,
    B: ShortcutBackend,
{
    controller.start(&initial);
    log::info!("[CONTROLLER] Event loop started");

    while let Some(event) = inbox.recv().await {
        if controller.handle(event) == Flow::Stop {
            break;
        }
    }

    // Senders gone without an explicit shutdown still release OS resources.
    controller.shutdown();
    log::info!("[CONTROLLER] Event loop stopped");
}
