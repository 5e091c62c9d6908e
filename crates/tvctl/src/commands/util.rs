//! Shared helpers for command handlers.

use std::io::IsTerminal;

use tvctl_core::ActionResult;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::Printer;

/// Print an action outcome. Device-reported failures become a non-zero exit.
///
/// Structured formats always emit the result object first so scripts can
/// inspect `is_error` alongside the exit code.
pub fn report(result: &ActionResult, global: &GlobalOpts) -> Result<(), CliError> {
    let printer = Printer::new(global);
    if printer.is_structured() || !result.is_error {
        printer.item(result, |r| r.text.clone(), |r| r.text.clone())?;
    }
    if result.is_error {
        return Err(CliError::ActionFailed {
            message: result.text.clone(),
        });
    }
    Ok(())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
