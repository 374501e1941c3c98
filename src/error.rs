//! Central error types for Markdown Capture.
//!
//! This module provides typed errors for better error handling across the codebase.
//! All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Markdown Capture operations.
#[derive(Error, Debug)]
pub enum MdCaptureError {
    /// Hotkey configuration cannot be turned into an accelerator
    #[error("Invalid hotkey: {0}")]
    InvalidHotkey(String),

    /// The OS shortcut facility refused a binding
    #[error("Hotkey {accelerator} could not be registered: {reason}")]
    HotkeyUnavailable { accelerator: String, reason: String },

    /// Window creation or content load failed
    #[error("Window error: {0}")]
    WindowError(String),

    /// Settings failed validation
    #[error("Invalid settings: {}", .0.join(", "))]
    InvalidSettings(Vec<String>),

    /// Settings store read/write failed
    #[error("Settings store error: {0}")]
    SettingsStore(String),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Tauri runtime error
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    /// Lock poisoned (mutex/rwlock)
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Implement Serialize for Tauri IPC compatibility.
/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for MdCaptureError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Helper trait for converting mutex lock errors to MdCaptureError.
pub trait LockResultExt<T> {
    /// Convert a poisoned lock error to MdCaptureError with context.
    fn map_lock_err(self, context: &str) -> Result<T, MdCaptureError>;
}

impl<T> LockResultExt<T> for Result<T, std::sync::PoisonError<T>> {
    fn map_lock_err(self, context: &str) -> Result<T, MdCaptureError> {
        self.map_err(|_| MdCaptureError::LockPoisoned {
            context: context.to_string(),
        })
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{MdCaptureResult, ResultExt};
///
/// fn load_template() -> MdCaptureResult<String> {
///     std::fs::read_to_string("template.md").context("failed to read template")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to MdCaptureError::Other.
    fn context(self, msg: &str) -> MdCaptureResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> MdCaptureResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> MdCaptureResult<T> {
        self.map_err(|e| MdCaptureError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> MdCaptureResult<T> {
        self.map_err(|e| MdCaptureError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to MdCaptureError::Other with the given message.
    fn context(self, msg: &str) -> MdCaptureResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> MdCaptureResult<T> {
        self.ok_or_else(|| MdCaptureError::Other(msg.to_string()))
    }
}

/// Type alias for Results using MdCaptureError.
pub type MdCaptureResult<T> = Result<T, MdCaptureError>;
