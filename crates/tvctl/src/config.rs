//! CLI configuration: thin wrapper around `tvctl_config` shared types.
//!
//! Re-exports the shared types and applies `GlobalOpts` flag overrides
//! (--adb, --timeout, --device) on top of file and environment values.

use std::time::Duration;

use tvctl_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tvctl_config::{
    Config, DeviceEntry, config_path, load_config, load_config_file, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load config from `--config` (or the platform path) plus environment.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config(global.config.as_deref())?)
}

/// Build a `ControllerConfig` with CLI flags taking priority.
pub fn controller_config(cfg: &Config, global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let mut cc = tvctl_config::to_controller_config(cfg)?;

    if let Some(ref adb) = global.adb {
        cc.transport.adb_path.clone_from(adb);
    }
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be greater than 0".into(),
            });
        }
        cc.command_timeout = Duration::from_secs(secs);
    }
    Ok(cc)
}

/// Resolve the target device (flag > env > default_device > only device).
pub fn target_device(cfg: &Config, global: &GlobalOpts) -> Result<String, CliError> {
    Ok(cfg.select_device(global.device.as_deref())?)
}
