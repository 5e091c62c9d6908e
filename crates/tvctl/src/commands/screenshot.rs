//! Screen capture handler.

use tvctl_core::{Controller, ScreenCapture};

use crate::cli::{GlobalOpts, ScreenshotArgs};
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(
    controller: &Controller,
    device: &str,
    args: &ScreenshotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match controller.screenshot(device).await? {
        ScreenCapture::Png(bytes) => {
            std::fs::write(&args.out, &bytes)?;
            Printer::new(global).line(&format!(
                "Saved {} bytes to {}",
                bytes.len(),
                args.out.display()
            ));
            Ok(())
        }
        ScreenCapture::Unavailable { reason } => Err(CliError::ActionFailed {
            message: format!("Screenshot unavailable: {reason}"),
        }),
    }
}
