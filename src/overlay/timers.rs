//! Clock and timer seams for the overlay lifecycle.
//!
//! Timers are fire-and-forget: the scheduler delivers `(TimerId, TimerTask)`
//! back to the owner of the lifecycle once the delay elapses. A canceled
//! timer may still be delivered if it raced with the cancel, so the lifecycle
//! re-validates every expiry.

use std::time::{Duration, Instant};

use super::host::WindowGeneration;

pub type TimerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Post-show delay elapsed: grab focus and notify the content.
    FocusAfterShow { generation: WindowGeneration },
    /// Blur debounce elapsed: decide whether the overlay should hide.
    BlurCheck { generation: WindowGeneration },
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId;

    fn cancel(&self, id: TimerId);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
