//! In-memory fakes shared by the unit tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::app::notify::Notifier;
use crate::app::tray::TrayControl;
use crate::config::SettingsBackend;
use crate::error::{MdCaptureError, MdCaptureResult};
use crate::hotkey::{Accelerator, ShortcutBackend};
use crate::overlay::{
    Clock, FocusOwner, OverlayWindow, Scheduler, TimerId, TimerTask, WindowGeneration, WindowHost,
};

/// Ordered record of side effects across several fakes.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

// ============================================================================
// Hotkeys
// ============================================================================

#[derive(Default)]
struct ShortcutState {
    refused: HashSet<String>,
    bound: Vec<String>,
    calls: Vec<String>,
}

/// Shortcut backend that binds in memory. Clones share state.
#[derive(Clone, Default)]
pub struct FakeShortcutBackend {
    state: Arc<Mutex<ShortcutState>>,
    journal: Option<Journal>,
}

impl FakeShortcutBackend {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal: Some(journal),
        }
    }

    /// Make the OS refuse this accelerator (display form).
    pub fn refuse(&self, accelerator: &str) {
        self.state.lock().refused.insert(accelerator.to_string());
    }

    pub fn bound(&self) -> Vec<String> {
        self.state.lock().bound.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: String) {
        if let Some(journal) = &self.journal {
            journal.push(format!("hotkey {}", call));
        }
        self.state.lock().calls.push(call);
    }
}

impl ShortcutBackend for FakeShortcutBackend {
    fn register(&mut self, id: &str, accelerator: &Accelerator) -> MdCaptureResult<()> {
        let shown = accelerator.to_string();
        self.record(format!("register {} {}", id, shown));

        let mut state = self.state.lock();
        if state.refused.contains(&shown) {
            return Err(MdCaptureError::HotkeyUnavailable {
                accelerator: shown,
                reason: "already registered".to_string(),
            });
        }
        state.bound.push(shown);
        Ok(())
    }

    fn unregister(&mut self, accelerator: &Accelerator) -> MdCaptureResult<()> {
        let shown = accelerator.to_string();
        self.record(format!("unregister {}", shown));
        self.state.lock().bound.retain(|b| *b != shown);
        Ok(())
    }
}

// ============================================================================
// Windows
// ============================================================================

#[derive(Default)]
struct OverlayFlags {
    visible: bool,
    focused: bool,
    show_calls: usize,
    notified: usize,
    closed: bool,
    destroyed: bool,
}

#[derive(Default)]
struct HostState {
    created: usize,
    fail_next_load: bool,
    focus_owner: Option<FocusOwner>,
    settings_shown: usize,
    settings_hidden: usize,
    settings_closed: usize,
    current: Option<Arc<Mutex<OverlayFlags>>>,
}

/// Window host whose windows are plain flags. Clones share state, so a test
/// keeps one clone to inspect and drive what the lifecycle owns.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
    journal: Option<Journal>,
}

pub struct FakeOverlay {
    flags: Arc<Mutex<OverlayFlags>>,
    journal: Option<Journal>,
    fail_load: bool,
}

impl FakeHost {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal: Some(journal),
        }
    }

    /// Overlays created so far.
    pub fn created(&self) -> usize {
        self.state.lock().created
    }

    /// Make the next overlay fail to load its content.
    pub fn fail_next_load(&self) {
        self.state.lock().fail_next_load = true;
    }

    /// Pin the answer to focus-owner queries. Unset means "the overlay if it
    /// is focused, otherwise another window".
    pub fn set_focus_owner(&self, owner: FocusOwner) {
        self.state.lock().focus_owner = Some(owner);
    }

    fn with_current<T: Default>(&self, f: impl FnOnce(&mut OverlayFlags) -> T) -> T {
        let current = self.state.lock().current.clone();
        current.map(|flags| f(&mut flags.lock())).unwrap_or_default()
    }

    pub fn visible(&self) -> bool {
        self.with_current(|w| w.visible)
    }

    pub fn focused(&self) -> bool {
        self.with_current(|w| w.focused)
    }

    /// Simulate the OS moving focus onto or off the overlay.
    pub fn set_focused(&self, focused: bool) {
        self.with_current(|w| w.focused = focused)
    }

    pub fn show_calls(&self) -> usize {
        self.with_current(|w| w.show_calls)
    }

    pub fn notified(&self) -> usize {
        self.with_current(|w| w.notified)
    }

    pub fn closed(&self) -> bool {
        self.with_current(|w| w.closed)
    }

    pub fn destroyed(&self) -> bool {
        self.with_current(|w| w.destroyed)
    }

    pub fn settings_shown(&self) -> usize {
        self.state.lock().settings_shown
    }

    pub fn settings_hidden(&self) -> usize {
        self.state.lock().settings_hidden
    }

    pub fn settings_closed(&self) -> usize {
        self.state.lock().settings_closed
    }

    fn record(&self, entry: &str) {
        if let Some(journal) = &self.journal {
            journal.push(entry);
        }
    }
}

impl FakeOverlay {
    fn record(&self, entry: &str) {
        if let Some(journal) = &self.journal {
            journal.push(entry);
        }
    }
}

impl OverlayWindow for FakeOverlay {
    fn load_content(&self) -> MdCaptureResult<()> {
        if self.fail_load {
            return Err(MdCaptureError::WindowError("content failed to load".to_string()));
        }
        Ok(())
    }

    fn show(&self) -> MdCaptureResult<()> {
        let mut flags = self.flags.lock();
        flags.visible = true;
        flags.show_calls += 1;
        Ok(())
    }

    fn hide(&self) -> MdCaptureResult<()> {
        let mut flags = self.flags.lock();
        flags.visible = false;
        flags.focused = false;
        Ok(())
    }

    fn focus(&self) -> MdCaptureResult<()> {
        self.flags.lock().focused = true;
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.flags.lock().focused
    }

    fn is_visible(&self) -> bool {
        self.flags.lock().visible
    }

    fn notify_shown(&self) -> MdCaptureResult<()> {
        self.flags.lock().notified += 1;
        Ok(())
    }

    fn close(&self) -> MdCaptureResult<()> {
        self.record("window close overlay");
        let mut flags = self.flags.lock();
        flags.closed = true;
        flags.visible = false;
        Ok(())
    }

    fn destroy(&self) -> MdCaptureResult<()> {
        let mut flags = self.flags.lock();
        flags.destroyed = true;
        flags.visible = false;
        Ok(())
    }
}

impl WindowHost for FakeHost {
    type Overlay = FakeOverlay;

    fn create_overlay(&mut self, _generation: WindowGeneration) -> MdCaptureResult<FakeOverlay> {
        let mut state = self.state.lock();
        state.created += 1;

        let flags = Arc::new(Mutex::new(OverlayFlags::default()));
        state.current = Some(Arc::clone(&flags));

        Ok(FakeOverlay {
            flags,
            journal: self.journal.clone(),
            fail_load: std::mem::take(&mut state.fail_next_load),
        })
    }

    fn focus_owner(&self, overlay: &FakeOverlay) -> FocusOwner {
        match self.state.lock().focus_owner {
            Some(owner) => owner,
            None if overlay.is_focused() => FocusOwner::Overlay,
            None => FocusOwner::Other,
        }
    }

    fn show_settings(&mut self) -> MdCaptureResult<()> {
        self.state.lock().settings_shown += 1;
        Ok(())
    }

    fn hide_settings(&mut self) -> MdCaptureResult<()> {
        self.state.lock().settings_hidden += 1;
        Ok(())
    }

    fn close_settings(&mut self) -> MdCaptureResult<()> {
        self.record("window close settings");
        self.state.lock().settings_closed += 1;
        Ok(())
    }
}

// ============================================================================
// Time
// ============================================================================

/// Clock that only moves when told to.
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }
}

impl ManualClock {
    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }

    pub fn set(&self, at: Duration) {
        *self.offset.lock() = at;
    }

    pub fn set_ms(&self, ms: u64) {
        self.set(Duration::from_millis(ms));
    }

    pub fn instant_at_ms(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub id: TimerId,
    /// Clock offset at which the timer is due.
    pub due: Duration,
    pub task: TimerTask,
}

#[derive(Default)]
struct SchedulerState {
    next_id: TimerId,
    pending: Vec<ScheduledTimer>,
    cancelled: Vec<TimerId>,
}

/// Scheduler that records timers against a [`ManualClock`]; the test fires
/// them explicitly.
pub struct ManualScheduler {
    clock: Arc<ManualClock>,
    state: Mutex<SchedulerState>,
}

impl ManualScheduler {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Timers neither fired nor cancelled, earliest first.
    pub fn pending(&self) -> Vec<ScheduledTimer> {
        let mut pending = self.state.lock().pending.clone();
        pending.sort_by_key(|t| (t.due, t.id));
        pending
    }

    pub fn cancelled(&self) -> Vec<TimerId> {
        self.state.lock().cancelled.clone()
    }

    /// Remove and return the earliest timer due at or before `until`.
    pub fn pop_due(&self, until: Duration) -> Option<ScheduledTimer> {
        let next = self.pending().into_iter().find(|t| t.due <= until)?;
        self.state.lock().pending.retain(|t| t.id != next.id);
        Some(next)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let due = self.clock.elapsed() + delay;
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.pending.push(ScheduledTimer { id, due, task });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut state = self.state.lock();
        state.pending.retain(|t| t.id != id);
        state.cancelled.push(id);
    }
}

// ============================================================================
// Tray, notifications, settings
// ============================================================================

#[derive(Default)]
struct TrayState {
    tooltips: Vec<String>,
    destroyed: bool,
}

#[derive(Clone, Default)]
pub struct FakeTray {
    state: Arc<Mutex<TrayState>>,
    journal: Option<Journal>,
}

impl FakeTray {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal: Some(journal),
        }
    }

    pub fn tooltip(&self) -> Option<String> {
        self.state.lock().tooltips.last().cloned()
    }

    pub fn destroyed(&self) -> bool {
        self.state.lock().destroyed
    }
}

impl TrayControl for FakeTray {
    fn set_tooltip(&self, text: &str) {
        self.state.lock().tooltips.push(text.to_string());
    }

    fn destroy(self: Box<Self>) {
        if let Some(journal) = &self.journal {
            journal.push("tray destroy");
        }
        self.state.lock().destroyed = true;
    }
}

#[derive(Clone, Default)]
pub struct FakeNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

impl Notifier for FakeNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.sent.lock().push((title.to_string(), body.to_string()));
    }
}

#[derive(Default)]
struct MemoryState {
    values: Map<String, Value>,
    fail_loads: bool,
    saves: usize,
}

/// Settings store kept in memory. Clones share state.
#[derive(Clone, Default)]
pub struct MemorySettingsBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySettingsBackend {
    pub fn put(&self, key: &str, value: Value) {
        self.state.lock().values.insert(key.to_string(), value);
    }

    pub fn stored(&self) -> Map<String, Value> {
        self.state.lock().values.clone()
    }

    pub fn fail_loads(&self) {
        self.state.lock().fail_loads = true;
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().saves
    }
}

impl SettingsBackend for MemorySettingsBackend {
    fn load(&self) -> MdCaptureResult<Map<String, Value>> {
        let state = self.state.lock();
        if state.fail_loads {
            return Err(MdCaptureError::SettingsStore("store unreadable".to_string()));
        }
        Ok(state.values.clone())
    }

    fn save(&self, entries: Vec<(String, Value)>) -> MdCaptureResult<()> {
        let mut state = self.state.lock();
        state.saves += 1;
        for (key, value) in entries {
            state.values.insert(key, value);
        }
        Ok(())
    }
}
