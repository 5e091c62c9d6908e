//! Shared configuration for tvctl.
//!
//! TOML file + environment layering, the legacy `TVCTL_DEVICES` JSON
//! device list, and translation to `tvctl_core::ControllerConfig`. The CLI
//! adds flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tvctl_core::model::DEFAULT_ADB_PORT;
use tvctl_core::{
    ControllerConfig, Device, DevicePlatform, RetryPolicy, TransportConfig, VerificationPolicy,
};

/// Environment variable holding a JSON device map.
pub const DEVICES_ENV: &str = "TVCTL_DEVICES";

const ENV_PREFIX: &str = "TVCTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no device selected and no default_device configured (available: {available})")]
    NoDevice { available: String },

    #[error("invalid {DEVICES_ENV} JSON: {0}")]
    DevicesJson(#[from] serde_json::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Device used when none is given on the command line.
    pub default_device: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub verification: VerificationSettings,

    /// Devices by identifier, in file order.
    #[serde(default)]
    pub devices: IndexMap<String, DeviceEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_adb_path")]
    pub adb_path: PathBuf,

    /// Retries for transient bridge failures.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_status_ttl_ms")]
    pub status_ttl_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            adb_path: default_adb_path(),
            retries: default_retries(),
            retry_backoff_ms: default_backoff_ms(),
            status_ttl_ms: default_status_ttl_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_adb_path() -> PathBuf {
    PathBuf::from("adb")
}
fn default_retries() -> u32 {
    2
}
fn default_backoff_ms() -> u64 {
    500
}
fn default_status_ttl_ms() -> u64 {
    2000
}

/// Playback verification timings, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationSettings {
    pub settle_ms: u64,
    pub max_attempts: u32,
    pub select_settle_ms: u64,
    pub confirm_window_ms: u64,
    pub direct_settle_ms: u64,
    pub direct_window_ms: u64,
    pub profile_grace_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self::from(VerificationPolicy::default())
    }
}

impl From<VerificationPolicy> for VerificationSettings {
    fn from(p: VerificationPolicy) -> Self {
        Self {
            settle_ms: millis(p.settle_delay),
            max_attempts: p.max_attempts,
            select_settle_ms: millis(p.select_settle),
            confirm_window_ms: millis(p.confirm_window),
            direct_settle_ms: millis(p.direct_settle),
            direct_window_ms: millis(p.direct_window),
            profile_grace_ms: millis(p.profile_grace),
            poll_interval_ms: millis(p.poll_interval),
        }
    }
}

impl VerificationSettings {
    fn to_policy(&self) -> Result<VerificationPolicy, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "verification.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "verification.poll_interval_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(VerificationPolicy {
            settle_delay: Duration::from_millis(self.settle_ms),
            max_attempts: self.max_attempts,
            select_settle: Duration::from_millis(self.select_settle_ms),
            confirm_window: Duration::from_millis(self.confirm_window_ms),
            direct_settle: Duration::from_millis(self.direct_settle_ms),
            direct_window: Duration::from_millis(self.direct_window_ms),
            profile_grace: Duration::from_millis(self.profile_grace_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// One configured TV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceEntry {
    /// Network address. `ip` is accepted for older device lists.
    #[serde(alias = "ip")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Display name (defaults to the identifier).
    pub name: Option<String>,

    /// `fire_tv` or `google_tv`; inferred from the identifier when unset.
    pub platform: Option<DevicePlatform>,
}

fn default_port() -> u16 {
    DEFAULT_ADB_PORT
}

impl Config {
    /// Pick the device to act on: explicit choice, then `default_device`,
    /// then the only configured device.
    pub fn select_device(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        if let Some(id) = explicit.or(self.default_device.as_deref()) {
            return Ok(id.to_owned());
        }
        let mut ids = self.devices.keys();
        match (ids.next(), ids.next()) {
            (Some(only), None) => Ok(only.clone()),
            _ => Err(ConfigError::NoDevice {
                available: self.device_ids().join(", "),
            }),
        }
    }

    pub fn device_ids(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }

    /// Merge a JSON device map (`{"id": {"ip": "...", "port": 5555, "name": "..."}}`)
    /// over the configured devices.
    pub fn merge_devices_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let devices: IndexMap<String, DeviceEntry> = serde_json::from_str(json)?;
        debug!(count = devices.len(), "merging devices from {DEVICES_ENV}");
        self.devices.extend(devices);
        Ok(())
    }

    /// Restore the document order of `devices`. Figment extracts through a
    /// sorted map, so the order has to be recovered from the source text.
    fn order_devices(&mut self, order: &[String]) {
        let rank = |id: &str| order.iter().position(|o| o == id).unwrap_or(order.len());
        self.devices
            .sort_by(|a, _, b, _| rank(a.as_str()).cmp(&rank(b.as_str())));
    }
}

/// Device identifiers in the order a TOML document declares them.
fn device_order(toml: &str) -> Vec<String> {
    let Ok(mut doc) = toml.parse::<toml::Table>() else {
        return Vec::new();
    };
    match doc.remove("devices") {
        Some(toml::Value::Table(devices)) => devices.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Read the config file, treating a missing file as empty.
fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "tvctl", "tvctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tvctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn base_figment() -> Figment {
    Figment::new().merge(Serialized::defaults(Config::default()))
}

/// Load the full Config from file + environment.
///
/// `path` overrides the platform config location. `TVCTL_`-prefixed
/// variables override file values (`TVCTL_DEFAULTS__TIMEOUT=30`), and
/// `TVCTL_DEVICES` adds devices from JSON.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = base_figment().merge(Toml::file(&path)).merge(
        Env::prefixed(ENV_PREFIX)
            .ignore(&["devices", "device", "config", "output", "color", "adb", "timeout"])
            .split("__"),
    );

    let mut config: Config = figment.extract()?;
    config.order_devices(&device_order(&read_config_text(&path)?));
    if let Ok(json) = std::env::var(DEVICES_ENV) {
        config.merge_devices_json(&json)?;
    }
    Ok(config)
}

/// Load only the config file (no environment), for edit-and-save flows.
/// A missing file yields the defaults.
pub fn load_config_file(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let mut config: Config = base_figment().merge(Toml::file(&path)).extract()?;
    config.order_devices(&device_order(&read_config_text(&path)?));
    Ok(config)
}

/// Parse a TOML document over the built-in defaults. No environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let mut config: Config = base_figment().merge(Toml::string(toml)).extract()?;
    config.order_devices(&device_order(toml));
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical path).
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

// ── Translation to core ─────────────────────────────────────────────

/// Build a `ControllerConfig` from the loaded file and environment.
pub fn to_controller_config(cfg: &Config) -> Result<ControllerConfig, ConfigError> {
    let mut devices = Vec::with_capacity(cfg.devices.len());
    for (id, entry) in &cfg.devices {
        if entry.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: format!("devices.{id}.host"),
                reason: "must not be empty".into(),
            });
        }
        if entry.port == 0 {
            return Err(ConfigError::Validation {
                field: format!("devices.{id}.port"),
                reason: "must be between 1 and 65535".into(),
            });
        }
        let name = entry.name.clone().unwrap_or_else(|| id.clone());
        let mut device = Device::new(id.as_str(), entry.host.trim(), entry.port, name);
        if let Some(platform) = entry.platform {
            device = device.with_platform(platform);
        }
        devices.push(device);
    }

    if cfg.defaults.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "defaults.timeout".into(),
            reason: "must be greater than 0".into(),
        });
    }
    let command_timeout = Duration::from_secs(cfg.defaults.timeout);

    Ok(ControllerConfig {
        devices,
        command_timeout,
        retry: RetryPolicy {
            max_retries: cfg.defaults.retries,
            backoff_step: Duration::from_millis(cfg.defaults.retry_backoff_ms),
        },
        status_ttl: Duration::from_millis(cfg.defaults.status_ttl_ms),
        verification: cfg.verification.to_policy()?,
        transport: TransportConfig {
            adb_path: cfg.defaults.adb_path.clone(),
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_device = "living_room"

[defaults]
timeout = 15
retries = 4

[verification]
max_attempts = 15

[devices.living_room]
host = "192.168.1.20"
name = "Living Room"

[devices.fire_tv]
ip = "192.168.1.21"
port = 5556
"#;

    #[test]
    fn defaults_without_file() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.retries, 2);
        assert_eq!(cfg.verification.max_attempts, 3);
        assert!(cfg.devices.is_empty());
    }

    #[test]
    fn parses_devices_in_order() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.device_ids(), vec!["living_room", "fire_tv"]);

        let fire = &cfg.devices["fire_tv"];
        assert_eq!(fire.host, "192.168.1.21");
        assert_eq!(fire.port, 5556);
        assert_eq!(cfg.devices["living_room"].port, 5555);
    }

    #[test]
    fn translates_to_controller_config() {
        let cfg = parse_config(SAMPLE).unwrap();
        let cc = to_controller_config(&cfg).unwrap();

        assert_eq!(cc.command_timeout, Duration::from_secs(15));
        assert_eq!(cc.retry.max_retries, 4);
        assert_eq!(cc.verification.max_attempts, 15);
        assert_eq!(cc.verification.settle_delay, Duration::from_secs(3));
        assert_eq!(cc.devices.len(), 2);
        assert_eq!(cc.devices[0].name, "Living Room");
        assert_eq!(cc.devices[0].platform, DevicePlatform::GoogleTv);
        assert_eq!(cc.devices[1].name, "fire_tv");
        assert_eq!(cc.devices[1].platform, DevicePlatform::FireTv);
        assert_eq!(cc.devices[1].serial(), "192.168.1.21:5556");
    }

    #[test]
    fn explicit_platform_wins() {
        let cfg = parse_config(
            "[devices.den]\nhost = \"10.0.0.2\"\nplatform = \"fire_tv\"\n",
        )
        .unwrap();
        let cc = to_controller_config(&cfg).unwrap();
        assert_eq!(cc.devices[0].platform, DevicePlatform::FireTv);
    }

    #[test]
    fn rejects_bad_values() {
        let empty_host = parse_config("[devices.den]\nhost = \" \"\n").unwrap();
        assert!(matches!(
            to_controller_config(&empty_host),
            Err(ConfigError::Validation { field, .. }) if field == "devices.den.host"
        ));

        let zero_port = parse_config("[devices.den]\nhost = \"h\"\nport = 0\n").unwrap();
        assert!(matches!(
            to_controller_config(&zero_port),
            Err(ConfigError::Validation { field, .. }) if field == "devices.den.port"
        ));

        let zero_attempts = parse_config("[verification]\nmax_attempts = 0\n").unwrap();
        assert!(to_controller_config(&zero_attempts).is_err());
    }

    #[test]
    fn merges_legacy_device_json() {
        let mut cfg = parse_config(SAMPLE).unwrap();
        cfg.merge_devices_json(
            r#"{"fire_tv": {"ip": "10.1.1.1", "port": 5555, "name": "Fire TV"},
                "google_tv": {"ip": "10.1.1.2", "name": "Google TV"}}"#,
        )
        .unwrap();

        assert_eq!(cfg.device_ids(), vec!["living_room", "fire_tv", "google_tv"]);
        assert_eq!(cfg.devices["fire_tv"].host, "10.1.1.1");
        assert_eq!(cfg.devices["google_tv"].port, 5555);

        assert!(matches!(
            cfg.merge_devices_json("not json"),
            Err(ConfigError::DevicesJson(_))
        ));
    }

    #[test]
    fn device_selection() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.select_device(Some("fire_tv")).unwrap(), "fire_tv");
        assert_eq!(cfg.select_device(None).unwrap(), "living_room");

        let single = parse_config("[devices.den]\nhost = \"h\"\n").unwrap();
        assert_eq!(single.select_device(None).unwrap(), "den");

        let mut many = parse_config(SAMPLE).unwrap();
        many.default_device = None;
        assert!(matches!(
            many.select_device(None),
            Err(ConfigError::NoDevice { available }) if available == "living_room, fire_tv"
        ));
    }

    #[test]
    fn save_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = parse_config(SAMPLE).unwrap();

        let written = save_config(&cfg, Some(&path)).unwrap();
        assert_eq!(written, path);

        let loaded = load_config_file(Some(&path)).unwrap();
        assert_eq!(loaded.default_device.as_deref(), Some("living_room"));
        assert_eq!(loaded.devices["fire_tv"].port, 5556);
        assert_eq!(loaded.device_ids(), vec!["living_room", "fire_tv"]);
    }

    #[test]
    fn load_keeps_file_order_after_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[devices.zulu]\nhost = \"10.0.0.3\"\n\n[devices.alpha]\nhost = \"10.0.0.4\"\n",
        )
        .unwrap();

        let mut cfg = load_config_file(Some(&path)).unwrap();
        assert_eq!(cfg.device_ids(), vec!["zulu", "alpha"]);

        cfg.devices.insert(
            "mike".into(),
            DeviceEntry {
                host: "10.0.0.5".into(),
                port: 5555,
                name: None,
                platform: None,
            },
        );
        save_config(&cfg, Some(&path)).unwrap();

        let reloaded = load_config(Some(&path)).unwrap();
        assert_eq!(reloaded.device_ids(), vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_file(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(cfg.devices.is_empty());
        assert_eq!(cfg.defaults.adb_path, PathBuf::from("adb"));
    }
}
