//! Control layer between the debug-bridge transport and consumers (CLI, agents).
//!
//! - **[`Controller`]**: facade exposing the device operations (`play`,
//!   `navigate`, `play_pause`, `turn_on`/`turn_off`, `volume`, `get_status`,
//!   `list_packages`, `list_devices`). Owns the caches; cheap to clone.
//!
//! - **[`CommandExecutor`]**: runs one bridge command against a configured
//!   device with a timeout and retries transient transport failures with
//!   linear backoff.
//!
//! - **[`normalize`]**: pure mapping from web content URLs to the deep-link
//!   form each streaming app accepts.
//!
//! - **[`DumpParser`]**: tolerant, line-oriented parsing of `dumpsys` output
//!   into [`DeviceStatus`] and [`PlaybackSample`]. Missing fields never fail.
//!
//! - **[`PackageResolver`]**: discovers which installed package implements a
//!   logical streaming app, cached per device for the process lifetime.
//!
//! - **[`Verifier`]**: bounded polling state machine confirming that playback
//!   actually started after a deep link.

pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod model;
pub mod normalize;
pub mod packages;
pub mod parse;
pub mod store;
pub mod verify;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, RetryPolicy};
pub use controller::{Controller, Freshness};
pub use error::CoreError;
pub use executor::{CommandExecutor, ExecOptions};
pub use normalize::{ContentService, normalize};
pub use packages::{Lookup, PackageResolver};
pub use parse::{DumpParser, DumpsysParser};
pub use store::{PackageCache, StatusCache};
pub use verify::{PlaybackProbe, VerificationPolicy, Verifier, VerifyMode, VerifyOutcome, VerifyState};

pub use model::{
    ActionResult, Device, DeviceId, DevicePlatform, DeviceReachability, DeviceRegistry,
    DeviceStatus, NavAction, PlaybackSample, PlaybackState, Reachability, ScreenCapture,
    ScreenState, StreamingApp, VolumeAction, VolumeReading, parse_action,
};

// Transport types consumers need to build a controller.
pub use tvctl_adb::{AdbTransport, CommandOutput, ShellTransport, TransportConfig};
