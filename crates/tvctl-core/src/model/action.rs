// ── Typed actions and results ──

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use strum::{EnumIter, EnumString, IntoEnumIterator};

use super::device::Device;
use crate::error::CoreError;

/// Parse a caller-supplied action name (`"up"`, `"mute"`, ...).
///
/// Matching is case-insensitive; the error lists every accepted name.
pub fn parse_action<T>(kind: &'static str, value: &str) -> Result<T, CoreError>
where
    T: FromStr + IntoEnumIterator + Display,
{
    value.trim().parse().map_err(|_| CoreError::InvalidAction {
        kind,
        value: value.to_owned(),
        expected: T::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
    })
}

// ── Navigation ──────────────────────────────────────────────────────

/// Remote-control navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum NavAction {
    Up,
    Down,
    Left,
    Right,
    #[strum(to_string = "select", serialize = "enter", serialize = "ok")]
    Select,
    Back,
    Home,
    Menu,
}

impl NavAction {
    pub fn keycode(self) -> &'static str {
        match self {
            Self::Up => "KEYCODE_DPAD_UP",
            Self::Down => "KEYCODE_DPAD_DOWN",
            Self::Left => "KEYCODE_DPAD_LEFT",
            Self::Right => "KEYCODE_DPAD_RIGHT",
            Self::Select => "KEYCODE_DPAD_CENTER",
            Self::Back => "KEYCODE_BACK",
            Self::Home => "KEYCODE_HOME",
            Self::Menu => "KEYCODE_MENU",
        }
    }
}

// ── Volume ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VolumeAction {
    Up,
    Down,
    Mute,
}

impl VolumeAction {
    pub fn keycode(self) -> &'static str {
        match self {
            Self::Up => "KEYCODE_VOLUME_UP",
            Self::Down => "KEYCODE_VOLUME_DOWN",
            Self::Mute => "KEYCODE_VOLUME_MUTE",
        }
    }
}

// ── Streaming apps ──────────────────────────────────────────────────

/// Logical streaming apps whose package name is discovered per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StreamingApp {
    #[strum(to_string = "youtube")]
    YouTube,
    Netflix,
    Prime,
    AppleTv,
}

impl StreamingApp {
    /// Package-name fragments that identify this app, in priority order.
    pub fn fragments(self) -> &'static [&'static str] {
        match self {
            Self::YouTube => &["youtube"],
            Self::Netflix => &["netflix"],
            Self::Prime => &["amazonvideo", "avod", "prime"],
            Self::AppleTv => &["appletv"],
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────

/// Outcome of a device action, shaped for a conversational caller.
///
/// `is_error` is `false` for partial successes (content opened but playback
/// unverified): the caller decides on remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub text: String,
    pub is_error: bool,
}

impl ActionResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Whether the bridge can currently talk to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceReachability {
    pub device: Arc<Device>,
    pub reachability: Reachability,
}

/// Result of a screen capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCapture {
    /// PNG-encoded image.
    Png(Bytes),
    /// Capture produced no image. Secure video surfaces (DRM) do this
    /// legitimately, so it is not treated as a failure.
    Unavailable { reason: String },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nav_aliases_parse_to_select() {
        assert_eq!("select".parse::<NavAction>().unwrap(), NavAction::Select);
        assert_eq!("enter".parse::<NavAction>().unwrap(), NavAction::Select);
        assert_eq!("OK".parse::<NavAction>().unwrap(), NavAction::Select);
        assert_eq!(NavAction::Select.to_string(), "select");
        assert!("jump".parse::<NavAction>().is_err());
    }

    #[test]
    fn streaming_app_names() {
        assert_eq!("youtube".parse::<StreamingApp>().unwrap(), StreamingApp::YouTube);
        assert_eq!("appletv".parse::<StreamingApp>().unwrap(), StreamingApp::AppleTv);
        assert_eq!(StreamingApp::AppleTv.to_string(), "appletv");
        assert!("hulu".parse::<StreamingApp>().is_err());
    }

    #[test]
    fn parse_action_lists_expected_names() {
        let nav: NavAction = parse_action("navigation action", " Home ").unwrap();
        assert_eq!(nav, NavAction::Home);

        let err = parse_action::<VolumeAction>("volume action", "louder").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown volume action 'louder' (expected one of: up, down, mute)"
        );
        assert!(err.is_config());
    }

    #[test]
    fn volume_keycodes() {
        assert_eq!(VolumeAction::Mute.keycode(), "KEYCODE_VOLUME_MUTE");
        assert_eq!("UP".parse::<VolumeAction>().unwrap(), VolumeAction::Up);
    }
}
