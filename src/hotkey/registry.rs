//! Global hotkey registry.
//!
//! Owns the mapping from logical hotkey id to the accelerator currently bound
//! with the OS. The actual binding goes through a [`ShortcutBackend`] so the
//! bookkeeping can be exercised without a running event loop.

use std::collections::HashMap;

use super::accelerator::{self, Accelerator, HotkeyConfig};
use crate::error::MdCaptureResult;

/// Logical id of the one hotkey the app binds.
pub const SHOW_OVERLAY_ID: &str = "show-overlay";

/// OS shortcut facility.
pub trait ShortcutBackend: Send {
    /// Bind `accelerator`; firing it must report `id` back to the controller.
    /// An `Err` means the OS refused the binding.
    fn register(&mut self, id: &str, accelerator: &Accelerator) -> MdCaptureResult<()>;

    fn unregister(&mut self, accelerator: &Accelerator) -> MdCaptureResult<()>;
}

pub struct HotkeyRegistry<B: ShortcutBackend> {
    backend: B,
    bindings: HashMap<String, Accelerator>,
}

impl<B: ShortcutBackend> HotkeyRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bindings: HashMap::new(),
        }
    }

    /// Bind `accelerator` under `id`.
    ///
    /// Returns `false` when the OS refuses; the refusal is logged and the
    /// mapping is left untouched.
    pub fn register(&mut self, id: &str, accelerator: Accelerator) -> bool {
        match self.backend.register(id, &accelerator) {
            Ok(()) => {
                log::info!("[HOTKEY] Registered hotkey {}: {}", id, accelerator);
                self.bindings.insert(id.to_string(), accelerator);
                true
            },
            Err(e) => {
                log::error!(
                    "[HOTKEY] Failed to register hotkey {}: {} ({})",
                    id,
                    accelerator,
                    e
                );
                false
            },
        }
    }

    /// Unbind everything. Safe to call with nothing registered.
    pub fn unregister_all(&mut self) {
        for (id, accelerator) in self.bindings.drain() {
            match self.backend.unregister(&accelerator) {
                Ok(()) => log::info!("[HOTKEY] Unregistered hotkey {}: {}", id, accelerator),
                Err(e) => log::warn!(
                    "[HOTKEY] Failed to unregister hotkey {}: {} ({})",
                    id,
                    accelerator,
                    e
                ),
            }
        }
    }

    /// Replace the show-overlay binding.
    ///
    /// Not transactional: the old binding is released before the new one is
    /// attempted, so a refused accelerator leaves no hotkey bound at all.
    pub fn rebuild(&mut self, config: &HotkeyConfig) -> bool {
        self.unregister_all();

        let accelerator = match accelerator::build(config) {
            Ok(accelerator) => accelerator,
            Err(e) => {
                log::warn!("[HOTKEY] No hotkey bound, configuration rejected: {}", e);
                return false;
            },
        };

        let bound = self.register(SHOW_OVERLAY_ID, accelerator);
        if !bound {
            log::warn!("[HOTKEY] No hotkey bound until the conflict is resolved");
        }
        bound
    }

    pub fn accelerator(&self, id: &str) -> Option<&Accelerator> {
        self.bindings.get(id)
    }

    pub fn bindings(&self) -> &HashMap<String, Accelerator> {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
