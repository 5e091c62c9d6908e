// ── Core error types ──
//
// Configuration problems, a bridge that cannot be spawned, and devices
// that stay unreachable are errors. Failed keypresses and unverified
// playback are ordinary `ActionResult` values: the caller decides what to
// do about a partial success.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Unknown device: {identifier} (available: {available})")]
    UnknownDevice {
        identifier: String,
        available: String,
    },

    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    InvalidAction {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot run adb: {message}")]
    Transport { message: String },

    #[error("Device {device} is unreachable: {message}")]
    Unreachable { device: String, message: String },

    #[error("Command to {device} timed out")]
    Timeout { device: String },

    #[error("{command} failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl CoreError {
    /// Configuration errors are never worth retrying.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownDevice { .. } | Self::InvalidAction { .. } | Self::Config { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tvctl_adb::Error> for CoreError {
    fn from(err: tvctl_adb::Error) -> Self {
        let message = if err.is_missing_binary() {
            format!("{err} (is the Android platform-tools `adb` binary installed and on PATH?)")
        } else {
            err.to_string()
        };
        CoreError::Transport { message }
    }
}
