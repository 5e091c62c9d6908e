//! Offline URL normalization preview.

use serde::Serialize;
use tabled::Tabled;
use tvctl_core::ContentService;

use crate::cli::{GlobalOpts, NormalizeArgs};
use crate::error::CliError;
use crate::output::Printer;

#[derive(Serialize)]
struct Normalized {
    input: String,
    output: String,
    service: String,
}

#[derive(Tabled)]
struct NormalizedRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Deep link")]
    output: String,
}

pub fn handle(args: &NormalizeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let rows: Vec<Normalized> = args
        .urls
        .iter()
        .map(|url| {
            let output = tvctl_core::normalize(url);
            Normalized {
                service: ContentService::detect(&output).to_string(),
                input: url.clone(),
                output,
            }
        })
        .collect();

    Printer::new(global).list(
        &rows,
        |n| NormalizedRow {
            service: n.service.clone(),
            output: n.output.clone(),
        },
        |n| n.output.clone(),
    )
}
