//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tvctl_config::ConfigError;
use tvctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Devices ──────────────────────────────────────────────────────
    #[error("Unknown device '{identifier}'")]
    #[diagnostic(
        code(tvctl::unknown_device),
        help("Configured devices: {available}\nRun: tvctl devices")
    )]
    UnknownDevice {
        identifier: String,
        available: String,
    },

    #[error("No device selected")]
    #[diagnostic(
        code(tvctl::no_device),
        help(
            "Pass --device (-d), set TVCTL_DEVICE, or pick a default with:\n\
             tvctl config set-default <id>\n\
             Configured devices: {available}"
        )
    )]
    NoDevice { available: String },

    #[error("Device {device} is unreachable: {message}")]
    #[diagnostic(
        code(tvctl::unreachable),
        help(
            "Check the TV is on the network with network debugging enabled.\n\
             Try: tvctl connect -d {device}"
        )
    )]
    Unreachable { device: String, message: String },

    #[error("Command to {device} timed out")]
    #[diagnostic(
        code(tvctl::timeout),
        help("Increase the limit with --timeout or check the device is responsive.")
    )]
    Timeout { device: String },

    // ── Bridge ───────────────────────────────────────────────────────
    #[error("Cannot run adb")]
    #[diagnostic(
        code(tvctl::adb_unavailable),
        help("{message}\nSet the binary with --adb or TVCTL_ADB.")
    )]
    AdbUnavailable { message: String },

    #[error("{command} failed: {message}")]
    #[diagnostic(code(tvctl::command_failed))]
    CommandFailed { command: String, message: String },

    /// The device accepted the request but reported failure.
    #[error("{message}")]
    #[diagnostic(code(tvctl::action_failed))]
    ActionFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Unknown {kind} '{value}'")]
    #[diagnostic(code(tvctl::invalid_action), help("Expected one of: {expected}"))]
    InvalidAction {
        kind: String,
        value: String,
        expected: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tvctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(tvctl::config),
        help("Inspect the resolved configuration with: tvctl config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(tvctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(tvctl::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(tvctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownDevice { .. } => exit_code::NOT_FOUND,
            Self::Unreachable { .. } | Self::AdbUnavailable { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoDevice { .. }
            | Self::InvalidAction { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownDevice {
                identifier,
                available,
            } => Self::UnknownDevice {
                identifier,
                available,
            },
            CoreError::InvalidAction {
                kind,
                value,
                expected,
            } => Self::InvalidAction {
                kind: kind.to_owned(),
                value,
                expected,
            },
            CoreError::Config { message } => Self::Config { message },
            CoreError::Transport { message } => Self::AdbUnavailable { message },
            CoreError::Unreachable { device, message } => Self::Unreachable { device, message },
            CoreError::Timeout { device } => Self::Timeout { device },
            CoreError::CommandFailed { command, message } => {
                Self::CommandFailed { command, message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoDevice { available } => Self::NoDevice {
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available
                },
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let unknown: CliError = CoreError::UnknownDevice {
            identifier: "attic".into(),
            available: "den".into(),
        }
        .into();
        assert_eq!(unknown.exit_code(), exit_code::NOT_FOUND);

        let offline: CliError = CoreError::Unreachable {
            device: "den".into(),
            message: "device offline".into(),
        }
        .into();
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let slow: CliError = CoreError::Timeout {
            device: "den".into(),
        }
        .into();
        assert_eq!(slow.exit_code(), exit_code::TIMEOUT);

        let bad: CliError = CoreError::InvalidAction {
            kind: "volume action",
            value: "louder".into(),
            expected: "up, down, mute".into(),
        }
        .into();
        assert_eq!(bad.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn empty_device_list_is_spelled_out() {
        let err: CliError = ConfigError::NoDevice {
            available: String::new(),
        }
        .into();
        assert!(matches!(err, CliError::NoDevice { ref available } if available == "(none)"));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
