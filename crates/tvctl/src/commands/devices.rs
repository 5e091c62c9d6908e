//! Device listing and connection handlers.

use tabled::Tabled;
use tvctl_core::{Controller, DeviceReachability};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::Printer;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "State")]
    state: String,
}

impl DeviceRow {
    fn new(d: &DeviceReachability, printer: &Printer<'_>) -> Self {
        Self {
            id: d.device.id.to_string(),
            name: d.device.name.clone(),
            platform: d.device.platform.to_string(),
            address: d.device.serial(),
            state: printer.state(&d.reachability.to_string().to_lowercase()),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = controller.list_devices().await;
    let printer = Printer::new(global);
    printer.list(
        &devices,
        |d| DeviceRow::new(d, &printer),
        |d| d.device.id.to_string(),
    )
}

pub async fn connect(
    controller: &Controller,
    device: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = controller.connect(device).await?;
    util::report(&result, global)
}
