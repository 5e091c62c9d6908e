//! Installed streaming app handlers.

use serde::Serialize;
use tabled::Tabled;
use tvctl_core::Controller;

use crate::cli::{AppsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Package")]
    package: String,
}

#[derive(Serialize)]
struct Resolved<'a> {
    app: &'a str,
    package: Option<String>,
}

pub async fn handle(
    controller: &Controller,
    device: &str,
    args: AppsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let printer = Printer::new(global);
    if let Some(app) = args.resolve {
        let package = controller.resolve_package(device, &app).await?;
        let resolved = Resolved { app: &app, package };
        return printer.item(
            &resolved,
            |r| match r.package {
                Some(ref pkg) => format!("{}: {pkg}", r.app),
                None => format!("{}: not installed", r.app),
            },
            |r| r.package.clone().unwrap_or_default(),
        );
    }

    let packages = controller.list_packages(device).await?;
    printer.list(
        &packages,
        |p| PackageRow { package: p.clone() },
        Clone::clone,
    )
}
