//! Command dispatch: bridges CLI args -> controller operations -> output formatting.

pub mod apps;
pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod normalize;
pub mod screenshot;
pub mod status;
pub mod util;

use tvctl_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if matches!(cmd, Command::Devices) {
        return devices::list(controller, global).await;
    }

    let device = config::target_device(cfg, global)?;
    match cmd {
        Command::Connect => devices::connect(controller, &device, global).await,
        Command::Status(args) => status::handle(controller, &device, &args, global).await,
        Command::Play(args) => control::play(controller, &device, &args.url, global).await,
        Command::Navigate(args) => control::navigate(controller, &device, &args.action, global).await,
        Command::PlayPause => control::play_pause(controller, &device, global).await,
        Command::On => control::power(controller, &device, true, global).await,
        Command::Off => control::power(controller, &device, false, global).await,
        Command::Volume(args) => control::volume(controller, &device, &args.action, global).await,
        Command::Type(args) => control::type_text(controller, &device, &args.text, global).await,
        Command::Apps(args) => apps::handle(controller, &device, args, global).await,
        Command::Screenshot(args) => screenshot::handle(controller, &device, &args, global).await,
        // Handled before a controller exists
        Command::Devices | Command::Config(_) | Command::Normalize(_) | Command::Completions(_) => {
            Ok(())
        }
    }
}
