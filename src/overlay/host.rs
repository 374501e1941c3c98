//! Window abstractions the overlay lifecycle drives.
//!
//! The Tauri implementation lives in `tauri_host.rs`; tests use the fakes in
//! `crate::testing`.

use crate::error::MdCaptureResult;

/// Identifies one overlay window instance. Bumped on every creation so that
/// events and timers from a previous instance can be told apart.
pub type WindowGeneration = u64;

/// Which window currently holds OS input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOwner {
    /// The overlay itself.
    Overlay,
    /// Some other window.
    Other,
    /// Nobody yet; a focus transfer is still in flight.
    Nobody,
}

/// Handle to a live overlay window.
pub trait OverlayWindow: Send {
    /// Load the capture surface content. Failure means the window is unusable.
    fn load_content(&self) -> MdCaptureResult<()>;

    fn show(&self) -> MdCaptureResult<()>;

    fn hide(&self) -> MdCaptureResult<()>;

    fn focus(&self) -> MdCaptureResult<()>;

    fn is_focused(&self) -> bool;

    fn is_visible(&self) -> bool;

    /// Tell the content it was (re)shown so it can reset its input.
    fn notify_shown(&self) -> MdCaptureResult<()>;

    fn close(&self) -> MdCaptureResult<()>;

    fn destroy(&self) -> MdCaptureResult<()>;
}

/// Creates windows and answers focus queries.
pub trait WindowHost: Send {
    type Overlay: OverlayWindow;

    /// Build the overlay, initially invisible. Ready/blur/closed events for
    /// it must carry `generation`.
    fn create_overlay(&mut self, generation: WindowGeneration) -> MdCaptureResult<Self::Overlay>;

    fn focus_owner(&self, overlay: &Self::Overlay) -> FocusOwner;

    /// Show (creating on demand) and focus the settings window.
    fn show_settings(&mut self) -> MdCaptureResult<()>;

    fn hide_settings(&mut self) -> MdCaptureResult<()>;

    fn close_settings(&mut self) -> MdCaptureResult<()>;
}
