// ── Controller facade ──
//
// Entry point for consumers. Owns the executor, parser, caches and
// verifier policy; every device operation goes through here. Operations
// on different devices share nothing but the caches, which are keyed by
// device, so they never contend.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tvctl_adb::{AdbTransport, CommandOutput, SENTINEL_EXIT, ShellTransport};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::executor::{CommandExecutor, ExecOptions};
use crate::model::{
    ActionResult, Device, DevicePlatform, DeviceReachability, DeviceRegistry, DeviceStatus, NavAction,
    PlaybackSample, PlaybackState, Reachability, ScreenCapture, ScreenState, StreamingApp,
    VolumeAction, VolumeReading,
};
use crate::normalize::{ContentService, normalize};
use crate::packages::{self, Lookup, PackageResolver};
use crate::parse::{DumpParser, DumpsysParser};
use crate::store::{PackageCache, StatusCache};
use crate::verify::{PlaybackProbe, Verifier, VerifyMode};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const VIEW_ACTION: &str = "android.intent.action.VIEW";
const FIRE_TV_YOUTUBE_ACTIVITY: &str = "dev.cobalt.app.MainActivity";
const FIRE_TV_APPLE_TV: &str = "com.apple.atve.amazon.appletv/.MainActivity";
const GOOGLE_TV_APPLE_TV: &str = "com.apple.atve.androidtv.appletv/.MainActivity";

const WAKE_TIMEOUT: Duration = Duration::from_secs(3);
const KEY_TIMEOUT: Duration = Duration::from_secs(3);
const SAMPLE_TIMEOUT: Duration = Duration::from_secs(8);
const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(3);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const NAV_SETTLE: Duration = Duration::from_millis(500);
const TOGGLE_SETTLE: Duration = Duration::from_millis(500);
const INPUT_SETTLE: Duration = Duration::from_millis(300);
const POWER_VERIFY_ATTEMPTS: u32 = 3;
const POWER_VERIFY_INTERVAL: Duration = Duration::from_secs(1);

/// Whether a status read may be served from the short-lived cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    #[default]
    Cached,
    /// Always query the device (playback polling, post-action checks).
    Fresh,
}

// ── Controller ───────────────────────────────────────────────────

/// Cheaply cloneable handle over shared controller state.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    executor: CommandExecutor,
    parser: Arc<dyn DumpParser>,
    resolver: PackageResolver,
    status_cache: StatusCache,
    cancel: CancellationToken,
}

impl Controller {
    /// Build a controller that drives the real `adb` binary.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = Arc::new(AdbTransport::new(config.transport.clone()));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: ControllerConfig,
        transport: Arc<dyn ShellTransport>,
    ) -> Result<Self, CoreError> {
        Self::with_parts(config, transport, Arc::new(DumpsysParser))
    }

    /// Full control over the transport and the dump parser.
    pub fn with_parts(
        config: ControllerConfig,
        transport: Arc<dyn ShellTransport>,
        parser: Arc<dyn DumpParser>,
    ) -> Result<Self, CoreError> {
        let registry = Arc::new(DeviceRegistry::new(config.devices.iter().cloned())?);
        let executor =
            CommandExecutor::new(transport, registry, config.command_timeout, config.retry);
        let resolver = PackageResolver::new(executor.clone(), Arc::new(PackageCache::new()));
        let status_cache = StatusCache::new(config.status_ttl);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                executor,
                parser,
                resolver,
                status_cache,
                cancel: CancellationToken::new(),
            }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &DeviceRegistry {
        self.inner.executor.registry()
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.inner.executor
    }

    pub fn device(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.registry().get(id)
    }

    /// Stop any in-flight playback verification. Verifications report
    /// the last status they saw as unverified.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Playback ─────────────────────────────────────────────────

    /// Deep link `url` on the device and confirm that playback started.
    ///
    /// Content that opened but could not be confirmed playing is a
    /// partial success (`is_error == false`).
    pub async fn play(&self, device_id: &str, url: &str) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let url = normalize(url);
        let service = ContentService::detect(&url);
        let mode = service.verify_mode();
        debug!(device = %device.id, %url, ?service, "play");

        if mode == VerifyMode::SelectToPlay {
            // Best effort: a sleeping panel ignores the intent.
            let wake = ExecOptions::timeout(WAKE_TIMEOUT).with_retries(0);
            let output = self.keyevent(&device, "KEYCODE_WAKEUP", wake).await?;
            if !output.success() {
                debug!(device = %device.id, stderr = %output.stderr.trim(), "wake key failed");
            }
        }

        let args = self.launch_args(&device, service, &url).await?;
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .inner
            .executor
            .exec_on(&device, &arg_refs, ExecOptions::default())
            .await?;
        if output.timed_out {
            return Ok(ActionResult::error("Command timed out"));
        }
        if !output.success() {
            return Ok(ActionResult::error(format!("Failed: {}", output.stderr.trim())));
        }

        let probe = DeviceProbe {
            controller: self,
            device: Arc::clone(&device),
        };
        let verifier = Verifier::new(self.inner.config.verification)
            .with_cancel(self.inner.cancel.child_token());
        let outcome = verifier.run(&probe, mode).await;
        let verified = outcome.is_verified();
        let status = outcome.status;

        if !verified {
            let mut text = format!(
                "Content opened but playback not verified. TV state: {}",
                status.state_text()
            );
            if let Some(ref context) = status.context {
                let _ = write!(text, ", Context: {context}");
            }
            return Ok(ActionResult::ok(text));
        }

        info!(device = %device.id, attempts = outcome.attempts, "playing");
        let app = status.app_name().unwrap_or("TV");
        Ok(ActionResult::ok(format!(
            "Playing on {app} - {}",
            status.state_text()
        )))
    }

    async fn launch_args(
        &self,
        device: &Device,
        service: ContentService,
        url: &str,
    ) -> Result<Vec<String>, CoreError> {
        let mut args: Vec<String> = ["shell", "am", "start"].map(String::from).to_vec();

        match service {
            ContentService::YouTube => {
                let package = self
                    .inner
                    .resolver
                    .resolve_app(device, StreamingApp::YouTube)
                    .await?;
                // Fire OS intercepts the generic intent; target the player directly.
                if let Some(pkg) = package.filter(|p| p.contains("amazon") || p.contains("firetv")) {
                    args.push("-n".into());
                    args.push(format!("{pkg}/{FIRE_TV_YOUTUBE_ACTIVITY}"));
                }
            }
            ContentService::AppleTv => {
                let lookup = self
                    .inner
                    .resolver
                    .lookup(device, StreamingApp::AppleTv)
                    .await?;
                let component = match lookup {
                    Lookup::Found(pkg) => Some(format!("{pkg}/.MainActivity")),
                    Lookup::Unlisted => Some(match device.platform {
                        DevicePlatform::FireTv => FIRE_TV_APPLE_TV.to_owned(),
                        DevicePlatform::GoogleTv => GOOGLE_TV_APPLE_TV.to_owned(),
                    }),
                    Lookup::NotInstalled => {
                        debug!(device = %device.id, "no Apple TV package, sending generic intent");
                        None
                    }
                };
                if let Some(component) = component {
                    args.push("-n".into());
                    args.push(component);
                }
            }
            ContentService::Netflix | ContentService::Max | ContentService::Other => {}
        }

        args.push("-a".into());
        args.push(VIEW_ACTION.into());
        if service == ContentService::Netflix {
            args.push("--activity-clear-task".into());
        }
        args.push("-d".into());
        args.push(shell_quote(url));
        Ok(args)
    }

    /// Toggle play/pause and confirm the media session changed state.
    pub async fn play_pause(&self, device_id: &str) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let before = self.sample(&device).await?;

        let output = self
            .keyevent(&device, "KEYCODE_MEDIA_PLAY_PAUSE", ExecOptions::default())
            .await?;
        if !output.success() {
            return Ok(ActionResult::error(format!(
                "Play/pause command failed: {}",
                output.stderr.trim()
            )));
        }

        tokio::time::sleep(TOGGLE_SETTLE).await;
        let after = self.sample(&device).await?;
        let (before_name, after_name) = (state_name(&before), state_name(&after));

        if before.state != after.state {
            Ok(ActionResult::ok(format!(
                "Play/pause toggled on {}: {before_name} → {after_name} (verified)",
                device.name
            )))
        } else if after.state.is_none() {
            Ok(ActionResult::error(format!(
                "Play/pause sent to {} but no active media session detected. Command may have had no effect.",
                device.name
            )))
        } else {
            Ok(ActionResult::error(format!(
                "Play/pause sent to {} but state did not change (still {after_name}). App may not have responded.",
                device.name
            )))
        }
    }

    // ── Navigation & input ───────────────────────────────────────

    /// Send a remote-control key and report the resulting UI state.
    pub async fn navigate(
        &self,
        device_id: &str,
        action: NavAction,
    ) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let focus_before = self.focus_line(&device).await?;

        let output = self
            .keyevent(&device, action.keycode(), ExecOptions::default())
            .await?;
        if !output.success() {
            return Ok(ActionResult::error(format!(
                "Navigation command failed: {}",
                output.stderr.trim()
            )));
        }

        tokio::time::sleep(NAV_SETTLE).await;
        let status = self.fetch_status(&device).await?;
        let focus_after = self.focus_line(&device).await?;

        let mut text = format!(
            "{} on {} - {}",
            capitalize(&action.to_string()),
            device.name,
            status.state_text()
        );
        if let Some(ref context) = status.context {
            let _ = write!(text, ", Context: {context}");
        }
        if focus_before.trim() != focus_after.trim() {
            text.push_str(" (screen changed)");
        }
        Ok(ActionResult::ok(text))
    }

    /// Type into the focused input field.
    ///
    /// Typed text cannot be read back over the bridge, so the result only
    /// says whether the current screen looks like it accepts input.
    pub async fn type_text(&self, device_id: &str, text: &str) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let escaped = escape_input_text(text);

        let output = self
            .inner
            .executor
            .exec_on(&device, &["shell", "input", "text", &escaped], ExecOptions::default())
            .await?;
        if !output.success() {
            return Ok(ActionResult::error(format!(
                "Typing command failed: {}",
                output.stderr.trim()
            )));
        }

        tokio::time::sleep(INPUT_SETTLE).await;
        let status = self.fetch_status(&device).await?;
        let context = status.context.as_deref().unwrap_or("unknown");
        let lower = context.to_ascii_lowercase();

        if ["search", "input", "edit"].iter().any(|k| lower.contains(k)) {
            Ok(ActionResult::ok(format!(
                "Text '{text}' sent successfully. Context: {context}"
            )))
        } else {
            Ok(ActionResult::ok(format!(
                "Text '{text}' sent, but current context '{context}' may not be an input field. Use screenshot to verify."
            )))
        }
    }

    // ── Power ────────────────────────────────────────────────────

    pub async fn turn_on(&self, device_id: &str) -> Result<ActionResult, CoreError> {
        self.set_power(device_id, ScreenState::On).await
    }

    pub async fn turn_off(&self, device_id: &str) -> Result<ActionResult, CoreError> {
        self.set_power(device_id, ScreenState::Off).await
    }

    async fn set_power(&self, device_id: &str, target: ScreenState) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let (keycode, verb, adjective, failure) = if target == ScreenState::On {
            ("KEYCODE_WAKEUP", "Turn on", "awake", "TV may not have woken up")
        } else {
            ("KEYCODE_SLEEP", "Turn off", "asleep", "TV may not have gone to sleep")
        };
        let already = self.power_state(&device).await? == target;

        let output = self.keyevent(&device, keycode, ExecOptions::default()).await?;
        if !output.success() {
            return Ok(ActionResult::error(format!(
                "{verb} command failed: {}",
                output.stderr.trim()
            )));
        }

        let mut last = ScreenState::Unknown;
        for _ in 0..POWER_VERIFY_ATTEMPTS {
            tokio::time::sleep(POWER_VERIFY_INTERVAL).await;
            last = self.power_state(&device).await?;
            if last == target {
                let state = if target == ScreenState::On { "on" } else { "off" };
                return Ok(ActionResult::ok(if already {
                    format!(
                        "{} was already {state} (verified: screen is {adjective})",
                        device.name
                    )
                } else {
                    format!(
                        "{} turned {state} successfully (verified: screen is now {adjective})",
                        device.name
                    )
                }));
            }
        }

        Ok(ActionResult::error(format!(
            "{verb} command sent but verification failed - {failure}. Last state: {last}"
        )))
    }

    async fn power_state(&self, device: &Device) -> Result<ScreenState, CoreError> {
        let parser = &self.inner.parser;
        let output = self.query(device, parser.power_command(), ExecOptions::default()).await?;
        Ok(parser.parse_status(&output.stdout_text()).screen)
    }

    // ── Volume ───────────────────────────────────────────────────

    /// Adjust volume and confirm the level or mute flag moved.
    pub async fn volume(
        &self,
        device_id: &str,
        action: VolumeAction,
    ) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let before = self.volume_reading(&device).await?;

        let output = self.keyevent(&device, action.keycode(), ExecOptions::default()).await?;
        if !output.success() {
            return Ok(ActionResult::error(format!(
                "Volume command failed: {}",
                output.stderr.trim()
            )));
        }

        tokio::time::sleep(INPUT_SETTLE).await;
        let after = self.volume_reading(&device).await?;

        Ok(describe_volume_change(action, before, after))
    }

    async fn volume_reading(&self, device: &Device) -> Result<VolumeReading, CoreError> {
        let parser = &self.inner.parser;
        let output = self.query(device, parser.volume_command(), ExecOptions::default()).await?;
        Ok(parser.parse_volume(&output.stdout_text()))
    }

    // ── Status ───────────────────────────────────────────────────

    /// Structured device status, from cache when allowed.
    pub async fn get_status(
        &self,
        device_id: &str,
        freshness: Freshness,
    ) -> Result<DeviceStatus, CoreError> {
        let device = self.device(device_id)?;
        if freshness == Freshness::Cached {
            if let Some(status) = self.inner.status_cache.get(&device.id) {
                debug!(device = %device.id, "status cache hit");
                return Ok(status);
            }
        }
        self.fetch_status(&device).await
    }

    /// One-line human-readable summary (always fresh).
    pub async fn status_report(&self, device_id: &str) -> Result<String, CoreError> {
        let device = self.device(device_id)?;
        let status = self.fetch_status(&device).await?;
        Ok(status.describe(&device.name))
    }

    async fn fetch_status(&self, device: &Device) -> Result<DeviceStatus, CoreError> {
        let parser = &self.inner.parser;
        let output = self.query(device, parser.status_command(), ExecOptions::default()).await?;
        let status = parser.parse_status(&output.stdout_text());
        self.inner.status_cache.insert(device.id.clone(), status.clone());
        Ok(status)
    }

    async fn sample(&self, device: &Device) -> Result<PlaybackSample, CoreError> {
        let parser = &self.inner.parser;
        let output = self
            .query(device, parser.playback_command(), ExecOptions::timeout(SAMPLE_TIMEOUT))
            .await?;
        Ok(parser.parse_playback(&output.stdout_text()))
    }

    async fn focus_line(&self, device: &Device) -> Result<String, CoreError> {
        let parser = &self.inner.parser;
        let output = self.query(device, parser.focus_command(), ExecOptions::default()).await?;
        Ok(output.stdout_text().into_owned())
    }

    /// Run a diagnostic query. A non-zero exit is normal (an empty `grep`
    /// exits 1); only a timeout or exhausted retries mean the device could
    /// not be read.
    async fn query(
        &self,
        device: &Device,
        command: &str,
        opts: ExecOptions,
    ) -> Result<CommandOutput, CoreError> {
        let output = self.inner.executor.shell(device, command, opts).await?;
        if output.timed_out {
            return Err(CoreError::Timeout {
                device: device.id.to_string(),
            });
        }
        if output.exit_code == SENTINEL_EXIT {
            return Err(CoreError::Unreachable {
                device: device.id.to_string(),
                message: output.stderr.trim().to_owned(),
            });
        }
        Ok(output)
    }

    async fn keyevent(
        &self,
        device: &Device,
        keycode: &str,
        opts: ExecOptions,
    ) -> Result<CommandOutput, CoreError> {
        self.inner
            .executor
            .exec_on(device, &["shell", "input", "keyevent", keycode], opts)
            .await
    }

    // ── Packages ─────────────────────────────────────────────────

    /// Installed streaming apps, sorted.
    pub async fn list_packages(&self, device_id: &str) -> Result<Vec<String>, CoreError> {
        let device = self.device(device_id)?;
        let output = self
            .query(&device, packages::LIST_COMMAND, ExecOptions::default())
            .await?;
        if !output.success() {
            return Err(CoreError::CommandFailed {
                command: packages::LIST_COMMAND.into(),
                message: output.stderr.trim().to_owned(),
            });
        }
        Ok(packages::streaming_packages(packages::parse_package_list(
            &output.stdout_text(),
        )))
    }

    /// Installed package implementing a logical app (`youtube`, `netflix`,
    /// `prime`, `appletv`). Cached per device for the process lifetime.
    pub async fn resolve_package(
        &self,
        device_id: &str,
        app: &str,
    ) -> Result<Option<String>, CoreError> {
        let device = self.device(device_id)?;
        self.inner.resolver.resolve(&device, app).await
    }

    // ── Devices ──────────────────────────────────────────────────

    /// Every configured device with its current bridge reachability.
    pub async fn list_devices(&self) -> Vec<DeviceReachability> {
        let checks = self.registry().iter().map(|device| async move {
            let reachability = match self
                .inner
                .executor
                .exec_on(
                    device,
                    &["get-state"],
                    ExecOptions::timeout(REACHABILITY_TIMEOUT).with_retries(0),
                )
                .await
            {
                Ok(out) if out.success() && out.stdout_text().contains("device") => {
                    Reachability::Online
                }
                Ok(_) => Reachability::Offline,
                Err(e) => {
                    warn!(device = %device.id, error = %e, "reachability check failed");
                    Reachability::Unknown
                }
            };
            DeviceReachability {
                device: Arc::clone(device),
                reachability,
            }
        });
        join_all(checks).await
    }

    /// Ask the bridge server to connect to the device over TCP.
    pub async fn connect(&self, device_id: &str) -> Result<ActionResult, CoreError> {
        let device = self.device(device_id)?;
        let serial = device.serial();
        let output = self
            .inner
            .executor
            .exec_global(&["connect", &serial], CONNECT_TIMEOUT)
            .await?;
        if output.timed_out {
            return Ok(ActionResult::error(format!(
                "Connecting to {} ({serial}) timed out",
                device.name
            )));
        }

        let text = format!("{}{}", output.stdout_text(), output.stderr);
        let lower = text.to_ascii_lowercase();
        if lower.contains("connected") || lower.contains("already") {
            info!(device = %device.id, %serial, "connected");
            Ok(ActionResult::ok(format!("Connected to {} ({serial})", device.name)))
        } else {
            Ok(ActionResult::error(format!(
                "Failed to connect to {} ({serial}): {}",
                device.name,
                text.trim()
            )))
        }
    }

    /// Capture the screen as PNG.
    pub async fn screenshot(&self, device_id: &str) -> Result<ScreenCapture, CoreError> {
        let device = self.device(device_id)?;
        let output = self
            .inner
            .executor
            .exec_on(&device, &["exec-out", "screencap", "-p"], ExecOptions::default())
            .await?;
        if output.timed_out {
            return Err(CoreError::Timeout {
                device: device.id.to_string(),
            });
        }
        if output.success() && output.stdout.starts_with(PNG_MAGIC) {
            return Ok(ScreenCapture::Png(output.stdout));
        }

        let stderr = output.stderr.trim();
        Ok(ScreenCapture::Unavailable {
            reason: format!(
                "no image captured (DRM or secure video often blocks capture): exit={}, bytes={}, stderr={}",
                output.exit_code,
                output.stdout.len(),
                if stderr.is_empty() { "none" } else { stderr }
            ),
        })
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("executor", &self.inner.executor)
            .field("cached_statuses", &self.inner.status_cache.len())
            .finish_non_exhaustive()
    }
}

// ── Verification probe ───────────────────────────────────────────

/// Binds the verifier to one device. Read failures degrade to empty
/// values so verification can only end as verified or unverified.
struct DeviceProbe<'a> {
    controller: &'a Controller,
    device: Arc<Device>,
}

#[async_trait]
impl PlaybackProbe for DeviceProbe<'_> {
    async fn status(&self) -> DeviceStatus {
        self.controller
            .fetch_status(&self.device)
            .await
            .unwrap_or_else(|e| {
                warn!(device = %self.device.id, error = %e, "status read failed during verification");
                DeviceStatus::default()
            })
    }

    async fn sample(&self) -> PlaybackSample {
        self.controller
            .sample(&self.device)
            .await
            .unwrap_or_else(|e| {
                warn!(device = %self.device.id, error = %e, "playback sample failed");
                PlaybackSample::default()
            })
    }

    async fn press_select(&self) {
        let opts = ExecOptions::timeout(KEY_TIMEOUT).with_retries(0);
        if let Err(e) = self
            .controller
            .keyevent(&self.device, NavAction::Select.keycode(), opts)
            .await
        {
            warn!(device = %self.device.id, error = %e, "select keypress failed");
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn state_name(sample: &PlaybackSample) -> String {
    match sample.state {
        Some(code) => match PlaybackState::from_code(code) {
            PlaybackState::None => format!("unknown({code})"),
            state => state.to_string(),
        },
        None => "unknown(none)".to_owned(),
    }
}

fn describe_volume_change(
    action: VolumeAction,
    before: VolumeReading,
    after: VolumeReading,
) -> ActionResult {
    if action == VolumeAction::Mute {
        return if before.muted == after.muted {
            let muted = after
                .muted
                .map_or_else(|| "unknown".to_owned(), |m| m.to_string());
            ActionResult::error(format!(
                "Mute command sent but state unchanged (muted={muted})"
            ))
        } else {
            let label = if after.muted == Some(true) { "muted" } else { "unmuted" };
            ActionResult::ok(format!("Mute toggled: {label}"))
        };
    }

    match (before.level, after.level) {
        (Some(b), Some(a)) => {
            let text = format!("Volume {b} → {a}");
            let moved = match action {
                VolumeAction::Up => a >= b,
                VolumeAction::Down | VolumeAction::Mute => a <= b,
            };
            if moved {
                ActionResult::ok(text)
            } else {
                ActionResult::error(text)
            }
        }
        (None, Some(a)) => ActionResult::error(format!("Volume is now {a}")),
        (_, None) => ActionResult::error("Volume command sent but could not verify level"),
    }
}

/// Single-quote for the device shell, which re-parses `adb shell` argv.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Escape text for `input text`: spaces become `%s`, shell metacharacters
/// are backslash-escaped.
fn escape_input_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => out.push_str("%s"),
            '\'' | '"' | '\\' | '&' | '|' | ';' | '<' | '>' | '(' | ')' | '$' | '`' | '*' | '?'
            | '~' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("https://x.y/?a=1&b=2"), "'https://x.y/?a=1&b=2'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn input_escaping() {
        assert_eq!(escape_input_text("it's a test"), r"it\'s%sa%stest");
        assert_eq!(escape_input_text("a&b"), r"a\&b");
        assert_eq!(escape_input_text("plain"), "plain");
    }

    #[test]
    fn state_names() {
        let playing = PlaybackSample {
            state: Some(3),
            ..PlaybackSample::default()
        };
        let odd = PlaybackSample {
            state: Some(1),
            ..PlaybackSample::default()
        };
        assert_eq!(state_name(&playing), "playing");
        assert_eq!(state_name(&odd), "unknown(1)");
        assert_eq!(state_name(&PlaybackSample::default()), "unknown(none)");
    }

    #[test]
    fn volume_change_messages() {
        let at = |level| VolumeReading {
            level: Some(level),
            muted: Some(false),
        };
        let up = describe_volume_change(VolumeAction::Up, at(5), at(6));
        assert_eq!(up, ActionResult::ok("Volume 5 → 6"));

        let stuck = describe_volume_change(VolumeAction::Down, at(5), at(6));
        assert!(stuck.is_error);

        let muted = VolumeReading {
            level: Some(5),
            muted: Some(true),
        };
        assert_eq!(
            describe_volume_change(VolumeAction::Mute, at(5), muted),
            ActionResult::ok("Mute toggled: muted")
        );
        assert!(describe_volume_change(VolumeAction::Mute, muted, muted).is_error);
        assert!(
            describe_volume_change(VolumeAction::Up, VolumeReading::default(), VolumeReading::default())
                .is_error
        );
    }

    #[test]
    fn capitalize_action() {
        assert_eq!(capitalize("select"), "Select");
        assert_eq!(capitalize(""), "");
    }
}
