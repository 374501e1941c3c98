//! Overlay timing constants.

use std::time::Duration;

/// Delays used by the overlay show path and the blur guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTiming {
    /// Wait after making the overlay visible before grabbing focus.
    pub focus_delay: Duration,
    /// Blurs arriving sooner than this after a show are treated as noise.
    pub blur_guard: Duration,
    /// Re-check delay for a blur that arrived inside the guard window.
    pub blur_recheck: Duration,
    /// Re-check delay while no window owns focus yet.
    pub focus_settle_retry: Duration,
}

impl Default for OverlayTiming {
    fn default() -> Self {
        Self {
            focus_delay: Duration::from_millis(50),
            blur_guard: Duration::from_millis(250),
            blur_recheck: Duration::from_millis(300),
            focus_settle_retry: Duration::from_millis(100),
        }
    }
}
