//! Result rendering for every `--output` mode.
//!
//! Handlers hand a [`Printer`] their data plus two projections: a human view
//! (table rows or a detail block) and a scripting key for `plain`. JSON and
//! YAML always serialize the full value.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Output sink configured from the global flags.
pub struct Printer<'a> {
    format: &'a OutputFormat,
    quiet: bool,
    color: bool,
}

impl<'a> Printer<'a> {
    pub fn new(global: &'a GlobalOpts) -> Self {
        Self {
            format: &global.output,
            quiet: global.quiet,
            color: color_enabled(&global.color),
        }
    }

    /// `true` for JSON/YAML, where callers must not print free text.
    pub fn is_structured(&self) -> bool {
        !matches!(self.format, OutputFormat::Table | OutputFormat::Plain)
    }

    /// Colorize a state word when color is on.
    pub fn state(&self, state: &str) -> String {
        paint_state(state, self.color)
    }

    /// Print a collection: table rows, serialized data, or one key per line.
    pub fn list<T, R>(
        &self,
        items: &[T],
        row: impl Fn(&T) -> R,
        key: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize,
        R: Tabled,
    {
        let text = match serialize(self.format, items)? {
            Some(text) => text,
            None if matches!(self.format, OutputFormat::Plain) => {
                items.iter().map(key).collect::<Vec<_>>().join("\n")
            }
            None => Table::new(items.iter().map(row)).with(Style::rounded()).to_string(),
        };
        self.line(&text);
        Ok(())
    }

    /// Print one value: a detail block, serialized data, or its key.
    pub fn item<T>(
        &self,
        value: &T,
        detail: impl Fn(&T) -> String,
        key: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize + ?Sized,
    {
        let text = match serialize(self.format, value)? {
            Some(text) => text,
            None if matches!(self.format, OutputFormat::Plain) => key(value),
            None => detail(value),
        };
        self.line(&text);
        Ok(())
    }

    /// Print free text unless quiet.
    pub fn line(&self, text: &str) {
        if self.quiet || text.is_empty() {
            return;
        }
        let _ = writeln!(io::stdout().lock(), "{text}");
    }

    /// Stderr spinner for slow device operations; hidden when quiet or
    /// when stderr is not a terminal.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.quiet || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message(message.to_owned());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

fn color_enabled(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Green for live states, yellow for transitional, red for off/offline.
fn paint_state(state: &str, color: bool) -> String {
    if !color {
        return state.to_owned();
    }
    match state {
        "on" | "online" | "playing" => state.green().to_string(),
        "paused" | "buffering" | "screensaver" => state.yellow().to_string(),
        "off" | "offline" => state.red().to_string(),
        _ => state.dimmed().to_string(),
    }
}

/// Serialized form for structured formats, `None` for human formats.
fn serialize<T: Serialize + ?Sized>(
    format: &OutputFormat,
    value: &T,
) -> Result<Option<String>, CliError> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::JsonCompact => Some(serde_json::to_string(value)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
        OutputFormat::Table | OutputFormat::Plain => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        level: u32,
    }

    #[test]
    fn structured_formats_keep_all_fields() {
        let items = [Item { id: "den", level: 3 }, Item { id: "attic", level: 7 }];
        assert_eq!(
            serialize(&OutputFormat::JsonCompact, &items[..]).unwrap().unwrap(),
            r#"[{"id":"den","level":3},{"id":"attic","level":7}]"#
        );
        assert!(
            serialize(&OutputFormat::Yaml, &items[0])
                .unwrap()
                .unwrap()
                .contains("level: 3")
        );
    }

    #[test]
    fn human_formats_are_not_serialized() {
        assert!(serialize(&OutputFormat::Table, &1).unwrap().is_none());
        assert!(serialize(&OutputFormat::Plain, &1).unwrap().is_none());
    }

    #[test]
    fn state_colors_only_when_enabled() {
        assert_eq!(paint_state("playing", false), "playing");
        assert_ne!(paint_state("playing", true), "playing");
        assert!(paint_state("offline", true).contains("offline"));
    }
}
