//! Clap derive structures for the `tvctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace crates so `build.rs` can include it for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tvctl -- remote control for Android TV devices over adb
#[derive(Debug, Parser)]
#[command(
    name = "tvctl",
    version,
    about = "Control Android TV and Fire TV devices from the command line",
    long_about = "Drives Android TV and Fire TV devices through the Android debug bridge.\n\n\
        Opens streaming deep links and verifies playback actually started,\n\
        sends remote-control keys, toggles power and volume, and reports\n\
        device status inferred from dumpsys output.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device identifier (overrides default_device)
    #[arg(long, short = 'd', env = "TVCTL_DEVICE", global = true)]
    pub device: Option<String>,

    /// Config file path
    #[arg(long, env = "TVCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the adb binary
    #[arg(long, env = "TVCTL_ADB", global = true)]
    pub adb: Option<PathBuf>,

    /// Per-command timeout in seconds
    #[arg(long, env = "TVCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TVCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List configured devices and whether adb can reach them
    #[command(alias = "ls")]
    Devices,

    /// Connect adb to the selected device over the network
    Connect,

    /// Show screen, foreground app and playback state
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Open a content URL in its streaming app and verify playback
    Play(PlayArgs),

    /// Send a remote-control key (up, down, left, right, select, back, home, menu)
    #[command(alias = "nav")]
    Navigate(NavigateArgs),

    /// Toggle play/pause on the active media session
    #[command(alias = "pp")]
    PlayPause,

    /// Wake the device
    On,

    /// Put the device to sleep
    Off,

    /// Adjust volume (up, down, mute)
    #[command(alias = "vol")]
    Volume(VolumeArgs),

    /// List installed streaming apps, or resolve one logical app
    Apps(AppsArgs),

    /// Capture the screen as PNG
    Screenshot(ScreenshotArgs),

    /// Type text into the focused field
    Type(TypeArgs),

    /// Show the deep link a URL is rewritten to (no device needed)
    Normalize(NormalizeArgs),

    /// Manage CLI configuration and devices
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Bypass the short-lived status cache
    #[arg(long)]
    pub fresh: bool,

    /// Print the one-line human summary instead of structured status
    #[arg(long, conflicts_with = "fresh")]
    pub summary: bool,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Content URL (Netflix, Max, Apple TV, YouTube, ...)
    pub url: String,
}

#[derive(Debug, Args)]
pub struct NavigateArgs {
    /// Key to press
    #[arg(value_name = "ACTION")]
    pub action: String,
}

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Volume change
    #[arg(value_name = "ACTION")]
    pub action: String,
}

#[derive(Debug, Args)]
pub struct AppsArgs {
    /// Logical app to resolve (youtube, netflix, prime, appletv)
    #[arg(long, short = 'r')]
    pub resolve: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScreenshotArgs {
    /// Output file
    #[arg(long, default_value = "screenshot.png")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct TypeArgs {
    /// Text to enter
    pub text: String,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// URLs to normalize
    #[arg(required = true)]
    pub urls: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Add or replace a device entry
    AddDevice(AddDeviceArgs),

    /// Remove a device entry
    RemoveDevice {
        /// Device identifier
        id: String,
    },

    /// Set the device used when --device is not given
    SetDefault {
        /// Device identifier
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AddDeviceArgs {
    /// Device identifier (e.g. living_room, fire_tv)
    pub id: String,

    /// Device address
    #[arg(long)]
    pub host: String,

    /// adb TCP port
    #[arg(long, default_value = "5555")]
    pub port: u16,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Platform (inferred from the identifier when omitted)
    #[arg(long)]
    pub platform: Option<PlatformArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    FireTv,
    GoogleTv,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
