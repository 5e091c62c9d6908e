//! Status handler.

use tvctl_core::{Controller, DeviceStatus, Freshness};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output::Printer;

fn detail(s: &DeviceStatus, printer: &Printer<'_>) -> String {
    let mut lines = vec![
        format!("Screen:   {}", printer.state(&s.screen.to_string())),
        format!("App:      {}", s.app_name().unwrap_or("-")),
        format!("Package:  {}", s.foreground_package.as_deref().unwrap_or("-")),
        format!("Context:  {}", s.context.as_deref().unwrap_or("-")),
        format!("Playback: {}", printer.state(&s.playback.to_string())),
    ];
    if let Some(ref title) = s.media_title {
        lines.push(format!("Title:    {title}"));
    }
    lines.join("\n")
}

pub async fn handle(
    controller: &Controller,
    device: &str,
    args: &StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let printer = Printer::new(global);
    if args.summary {
        printer.line(&controller.status_report(device).await?);
        return Ok(());
    }

    let freshness = if args.fresh {
        Freshness::Fresh
    } else {
        Freshness::Cached
    };
    let status = controller.get_status(device, freshness).await?;
    printer.item(&status, |s| detail(s, &printer), DeviceStatus::state_text)
}
