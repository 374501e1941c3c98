//! Overlay window lifecycle.
//!
//! ```text
//! Unborn --show--> (loading) --ready--> Visible <--show/hide--> Hidden
//!                     |                                           |
//!                     +--load failure--> Unborn        close --> Unborn
//! ```
//!
//! The window is kept alive across hide/show. It is only torn down when the
//! OS reports it closed, on a failed content load, or by `close_all` at
//! shutdown.
//!
//! ## Blur guard
//!
//! Tray clicks and hotkey activation can blur the overlay for a moment right
//! after it was shown. A blur within `blur_guard` of the last show is
//! therefore re-checked after `blur_recheck` instead of acted on. The check
//! hides only once another window verifiably owns focus; while nobody does,
//! it retries every `focus_settle_retry`. At most one check is pending per
//! window instance.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use super::host::{FocusOwner, OverlayWindow, WindowGeneration, WindowHost};
use super::timers::{Clock, Scheduler, TimerId, TimerTask};
use crate::config::OverlayTiming;

type ShownCallback = Arc<dyn Fn() + Send + Sync>;

/// Observers fired every time the overlay becomes visible.
#[derive(Clone, Default)]
pub struct ShownListeners {
    inner: Arc<Mutex<ListenerList>>,
}

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    callbacks: Vec<(u64, ShownCallback)>,
}

impl ShownListeners {
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut list = self.inner.lock();
        let id = list.next_id;
        list.next_id += 1;
        list.callbacks.push((id, Arc::new(callback)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Callbacks run without the list locked, so they may subscribe or
    /// unsubscribe.
    fn notify(&self) {
        let callbacks: Vec<ShownCallback> = self
            .inner
            .lock()
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

/// Handle returned by [`ShownListeners::subscribe`].
#[must_use = "dropping a Subscription keeps the callback registered; call unsubscribe to remove it"]
pub struct Subscription {
    id: u64,
    listeners: std::sync::Weak<Mutex<ListenerList>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.listeners.upgrade() {
            inner.lock().callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}

struct LiveWindow<W> {
    handle: W,
    generation: WindowGeneration,
    ready: bool,
}

/// Lifecycle state visible to callers, mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Unborn,
    Loading,
    Hidden,
    Visible,
}

pub struct OverlayLifecycle<H: WindowHost> {
    host: H,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    timing: OverlayTiming,
    window: Option<LiveWindow<H::Overlay>>,
    last_shown_at: Option<Instant>,
    pending_blur_check: Option<TimerId>,
    next_generation: WindowGeneration,
    listeners: ShownListeners,
}

impl<H: WindowHost> OverlayLifecycle<H> {
    pub fn new(
        host: H,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
        timing: OverlayTiming,
    ) -> Self {
        Self {
            host,
            scheduler,
            clock,
            timing,
            window: None,
            last_shown_at: None,
            pending_blur_check: None,
            next_generation: 1,
            listeners: ShownListeners::default(),
        }
    }

    pub fn listeners(&self) -> &ShownListeners {
        &self.listeners
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn last_shown_at(&self) -> Option<Instant> {
        self.last_shown_at
    }

    pub fn pending_blur_check(&self) -> Option<TimerId> {
        self.pending_blur_check
    }

    pub fn generation(&self) -> Option<WindowGeneration> {
        self.window.as_ref().map(|w| w.generation)
    }

    pub fn state(&self) -> OverlayState {
        match &self.window {
            None => OverlayState::Unborn,
            Some(w) if !w.ready => OverlayState::Loading,
            Some(w) if w.handle.is_visible() => OverlayState::Visible,
            Some(_) => OverlayState::Hidden,
        }
    }

    /// Show the overlay, creating it on first use.
    pub fn show(&mut self) {
        if let Some(window) = &self.window {
            let generation = window.generation;
            self.last_shown_at = Some(self.clock.now());
            if let Err(e) = window.handle.show() {
                log::error!("[OVERLAY] Failed to show overlay window: {}", e);
                return;
            }
            self.schedule_focus(generation);
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let handle = match self.host.create_overlay(generation) {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("[OVERLAY] Failed to create overlay window: {}", e);
                return;
            },
        };

        if let Err(e) = handle.load_content() {
            log::error!("[OVERLAY] Failed to load overlay window: {}", e);
            if let Err(e) = handle.destroy() {
                log::warn!("[OVERLAY] Failed to destroy half-built overlay: {}", e);
            }
            return;
        }

        self.window = Some(LiveWindow {
            handle,
            generation,
            ready: false,
        });
        log::info!("[OVERLAY] Overlay window created (generation {})", generation);
    }

    /// Content finished loading. Only the first signal per window counts.
    pub fn on_ready(&mut self, generation: WindowGeneration) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        if window.generation != generation || window.ready {
            return;
        }
        window.ready = true;

        self.last_shown_at = Some(self.clock.now());
        if let Err(e) = window.handle.show() {
            log::error!("[OVERLAY] Failed to show overlay window: {}", e);
            return;
        }
        self.schedule_focus(generation);
        log::info!("[OVERLAY] Overlay window ready and shown");
    }

    /// Hide without destroying. No-op when there is no window.
    pub fn hide(&mut self) {
        if let Some(window) = &self.window {
            match window.handle.hide() {
                Ok(()) => log::info!("[OVERLAY] Overlay window hidden"),
                Err(e) => log::error!("[OVERLAY] Failed to hide overlay window: {}", e),
            }
        }
    }

    pub fn on_blur(&mut self, generation: WindowGeneration) {
        if self.generation() != Some(generation) {
            return;
        }

        let since_show = self
            .last_shown_at
            .map(|at| self.clock.now().saturating_duration_since(at));

        match since_show {
            Some(elapsed) if elapsed < self.timing.blur_guard => {
                log::debug!(
                    "[OVERLAY] Blur {}ms after show, re-checking later",
                    elapsed.as_millis()
                );
                self.schedule_blur_check(generation, self.timing.blur_recheck);
            },
            _ => self.check_blur(generation),
        }
    }

    /// The OS reports the window gone.
    pub fn on_closed(&mut self, generation: WindowGeneration) {
        if self.generation() != Some(generation) {
            return;
        }
        self.window = None;
        self.cancel_blur_check();
        log::info!("[OVERLAY] Overlay window closed");
    }

    pub fn on_timer(&mut self, id: TimerId, task: TimerTask) {
        match task {
            TimerTask::FocusAfterShow { generation } => self.focus_and_notify(generation),
            TimerTask::BlurCheck { generation } => {
                // Superseded or canceled checks are dropped here.
                if self.pending_blur_check != Some(id) {
                    return;
                }
                self.pending_blur_check = None;
                self.check_blur(generation);
            },
        }
    }

    /// Close the overlay and settings windows unconditionally.
    pub fn close_all(&mut self) {
        self.cancel_blur_check();
        if let Some(window) = self.window.take() {
            if let Err(e) = window.handle.close() {
                log::warn!("[OVERLAY] Failed to close overlay window: {}", e);
            }
        }
        if let Err(e) = self.host.close_settings() {
            log::warn!("[OVERLAY] Failed to close settings window: {}", e);
        }
    }

    fn live(&self, generation: WindowGeneration) -> Option<&H::Overlay> {
        self.window
            .as_ref()
            .filter(|w| w.generation == generation)
            .map(|w| &w.handle)
    }

    fn schedule_focus(&self, generation: WindowGeneration) {
        self.scheduler.schedule(
            self.timing.focus_delay,
            TimerTask::FocusAfterShow { generation },
        );
    }

    fn focus_and_notify(&self, generation: WindowGeneration) {
        let Some(handle) = self.live(generation) else {
            return;
        };
        if !handle.is_visible() {
            return;
        }
        if let Err(e) = handle.focus() {
            log::warn!("[OVERLAY] Failed to focus overlay window: {}", e);
        }
        if let Err(e) = handle.notify_shown() {
            log::warn!("[OVERLAY] Failed to notify overlay content: {}", e);
        }
        self.listeners.notify();
    }

    fn schedule_blur_check(&mut self, generation: WindowGeneration, delay: std::time::Duration) {
        self.cancel_blur_check();
        let id = self
            .scheduler
            .schedule(delay, TimerTask::BlurCheck { generation });
        self.pending_blur_check = Some(id);
    }

    fn cancel_blur_check(&mut self) {
        if let Some(id) = self.pending_blur_check.take() {
            self.scheduler.cancel(id);
        }
    }

    fn check_blur(&mut self, generation: WindowGeneration) {
        let Some(handle) = self.live(generation) else {
            return;
        };
        if handle.is_focused() || !handle.is_visible() {
            return;
        }

        match self.host.focus_owner(handle) {
            FocusOwner::Nobody => {
                self.schedule_blur_check(generation, self.timing.focus_settle_retry);
            },
            FocusOwner::Other => {
                log::debug!("[OVERLAY] Focus moved to another window");
                self.hide();
            },
            FocusOwner::Overlay => {},
        }
    }
}
