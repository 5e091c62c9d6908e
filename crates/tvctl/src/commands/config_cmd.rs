//! Config subcommand handlers.

use dialoguer::Input;
use tvctl_core::DevicePlatform;

use crate::cli::{AddDeviceArgs, ConfigArgs, ConfigCommand, GlobalOpts, PlatformArg};
use crate::config::{self, Config, DeviceEntry};
use crate::error::CliError;
use crate::output::Printer;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

fn platform(arg: PlatformArg) -> DevicePlatform {
    match arg {
        PlatformArg::FireTv => DevicePlatform::FireTv,
        PlatformArg::GoogleTv => DevicePlatform::GoogleTv,
    }
}

fn validate_id(id: &str) -> Result<(), CliError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: "use letters, digits, '_' or '-'".into(),
        });
    }
    Ok(())
}

fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::save_config(cfg, global.config.as_deref())?;
    if !global.quiet {
        eprintln!("✓ Configuration written to {}", path.display());
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            Printer::new(global).item(&cfg, to_toml, |c| c.device_ids().join("\n"))
        }

        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config::config_path);
            Printer::new(global).line(&path.display().to_string());
            Ok(())
        }

        ConfigCommand::AddDevice(add) => {
            let mut cfg = config::load_config_file(global.config.as_deref())?;
            add_device(&mut cfg, add)?;
            save(&cfg, global)
        }

        ConfigCommand::RemoveDevice { id } => {
            let mut cfg = config::load_config_file(global.config.as_deref())?;
            if !cfg.devices.contains_key(&id) {
                return Err(CliError::UnknownDevice {
                    identifier: id,
                    available: cfg.device_ids().join(", "),
                });
            }
            if !util::confirm(&format!("Remove device '{id}'?"), "config remove-device", global.yes)? {
                return Ok(());
            }
            cfg.devices.shift_remove(&id);
            if cfg.default_device.as_deref() == Some(id.as_str()) {
                cfg.default_device = None;
            }
            save(&cfg, global)
        }

        ConfigCommand::SetDefault { id } => {
            let mut cfg = config::load_config_file(global.config.as_deref())?;
            if !cfg.devices.contains_key(&id) {
                return Err(CliError::UnknownDevice {
                    identifier: id,
                    available: cfg.device_ids().join(", "),
                });
            }
            cfg.default_device = Some(id);
            save(&cfg, global)
        }
    }
}

fn add_device(cfg: &mut Config, add: AddDeviceArgs) -> Result<(), CliError> {
    validate_id(&add.id)?;
    if add.host.trim().is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if add.port == 0 {
        return Err(CliError::Validation {
            field: "port".into(),
            reason: "must be between 1 and 65535".into(),
        });
    }
    let first = cfg.devices.is_empty();
    cfg.devices.insert(
        add.id.clone(),
        DeviceEntry {
            host: add.host.trim().to_owned(),
            port: add.port,
            name: add.name,
            platform: add.platform.map(platform),
        },
    );
    if first && cfg.default_device.is_none() {
        cfg.default_device = Some(add.id);
    }
    Ok(())
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config::config_path);
    if path.exists()
        && !util::confirm(
            &format!("{} exists. Overwrite?", path.display()),
            "config init",
            global.yes,
        )?
    {
        return Ok(());
    }

    eprintln!("tvctl configuration wizard");
    eprintln!("   Config path: {}\n", path.display());

    let id: String = Input::new()
        .with_prompt("Device identifier")
        .default("living_room".into())
        .interact_text()
        .map_err(prompt_err)?;
    let host: String = Input::new()
        .with_prompt("Device IP address")
        .interact_text()
        .map_err(prompt_err)?;
    let port: u16 = Input::new()
        .with_prompt("adb port")
        .default(tvctl_core::model::DEFAULT_ADB_PORT)
        .interact_text()
        .map_err(prompt_err)?;
    let name: String = Input::new()
        .with_prompt("Display name")
        .default(id.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let mut cfg = Config::default();
    add_device(
        &mut cfg,
        AddDeviceArgs {
            id: id.clone(),
            host,
            port,
            name: Some(name),
            platform: None,
        },
    )?;
    save(&cfg, global)?;

    eprintln!("  Default device: {id}");
    eprintln!("\n  Test it: tvctl status");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(id: &str, host: &str) -> AddDeviceArgs {
        AddDeviceArgs {
            id: id.into(),
            host: host.into(),
            port: 5555,
            name: None,
            platform: None,
        }
    }

    #[test]
    fn first_device_becomes_default() {
        let mut cfg = Config::default();
        add_device(&mut cfg, args("den", "10.0.0.2")).unwrap();
        add_device(&mut cfg, args("attic", "10.0.0.3")).unwrap();

        assert_eq!(cfg.default_device.as_deref(), Some("den"));
        assert_eq!(cfg.device_ids(), vec!["den", "attic"]);
    }

    #[test]
    fn rejects_bad_device_input() {
        let mut cfg = Config::default();
        assert!(add_device(&mut cfg, args("living room", "10.0.0.2")).is_err());
        assert!(add_device(&mut cfg, args("den", "  ")).is_err());
        assert!(cfg.devices.is_empty());
    }

    #[test]
    fn platform_flag_maps_to_core() {
        assert_eq!(platform(PlatformArg::FireTv), DevicePlatform::FireTv);
        assert_eq!(platform(PlatformArg::GoogleTv), DevicePlatform::GoogleTv);
    }
}
