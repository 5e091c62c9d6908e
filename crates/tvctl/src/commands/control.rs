//! Remote-control handlers: playback, navigation, power, volume, text.

use tvctl_core::{Controller, NavAction, VolumeAction, parse_action};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::Printer;

use super::util;

pub async fn play(
    controller: &Controller,
    device: &str,
    url: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if url.trim().is_empty() {
        return Err(CliError::Validation {
            field: "url".into(),
            reason: "must not be empty".into(),
        });
    }
    let spinner = Printer::new(global).spinner("Opening content and waiting for playback");
    let result = controller.play(device, url).await;
    spinner.finish_and_clear();
    util::report(&result?, global)
}

pub async fn navigate(
    controller: &Controller,
    device: &str,
    action: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let action: NavAction = parse_action("navigation action", action)?;
    let result = controller.navigate(device, action).await?;
    util::report(&result, global)
}

pub async fn play_pause(
    controller: &Controller,
    device: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = controller.play_pause(device).await?;
    util::report(&result, global)
}

pub async fn power(
    controller: &Controller,
    device: &str,
    on: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = Printer::new(global).spinner(if on {
        "Waking device"
    } else {
        "Putting device to sleep"
    });
    let result = if on {
        controller.turn_on(device).await
    } else {
        controller.turn_off(device).await
    };
    spinner.finish_and_clear();
    util::report(&result?, global)
}

pub async fn volume(
    controller: &Controller,
    device: &str,
    action: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let action: VolumeAction = parse_action("volume action", action)?;
    let result = controller.volume(device, action).await?;
    util::report(&result, global)
}

pub async fn type_text(
    controller: &Controller,
    device: &str,
    text: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = controller.type_text(device, text).await?;
    util::report(&result, global)
}
