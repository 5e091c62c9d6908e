// ── Inferred device status ──
//
// Everything here is derived from free-text diagnostic dumps, so every
// field is optional by construction: an absent marker means `Unknown` /
// `None`, never an error.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Screen power state, from the power manager's wakefulness marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScreenState {
    On,
    Off,
    Screensaver,
    #[default]
    Unknown,
}

/// Media playback state, from the media-session dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackState {
    Playing,
    Paused,
    Buffering,
    #[default]
    None,
}

impl PlaybackState {
    /// Map the platform's `PlaybackState` constants (3, 2, 6).
    pub fn from_code(code: u32) -> Self {
        match code {
            3 => Self::Playing,
            2 => Self::Paused,
            6 => Self::Buffering,
            _ => Self::None,
        }
    }
}

/// Structured status of one device, produced fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub screen: ScreenState,
    /// Package of the focused window (e.g. `com.netflix.ninja`).
    pub foreground_package: Option<String>,
    /// Activity class of the focused window.
    pub foreground_activity: Option<String>,
    /// Coarse classification of the activity ("player", "profile selection", ...).
    pub context: Option<String>,
    pub playback: PlaybackState,
    pub media_title: Option<String>,
}

impl DeviceStatus {
    /// Short app name: last dotted segment of the package.
    pub fn app_name(&self) -> Option<&str> {
        self.foreground_package
            .as_deref()
            .map(|pkg| pkg.rsplit('.').next().unwrap_or(pkg))
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    pub fn is_profile_selection(&self) -> bool {
        self.context
            .as_deref()
            .is_some_and(|c| c.to_ascii_lowercase().contains("profile"))
    }

    /// One-phrase state summary used in action messages.
    pub fn state_text(&self) -> String {
        if self.playback == PlaybackState::None {
            return match self.screen {
                ScreenState::Off => "TV is off".into(),
                ScreenState::Screensaver => "screensaver active".into(),
                ScreenState::On | ScreenState::Unknown => "idle".into(),
            };
        }
        match &self.media_title {
            Some(title) => format!("{} - {title}", self.playback),
            None => self.playback.to_string(),
        }
    }

    /// Human-readable one-liner, e.g.
    /// `Living Room: Screen on, App: Netflix, Playback: playing, Title: Dark`.
    pub fn describe(&self, display_name: &str) -> String {
        if self.screen == ScreenState::Off {
            return format!("{display_name}: Screen off");
        }
        let mut parts = vec![format!("{display_name}: Screen {}", self.screen)];
        if let Some(app) = self.app_name() {
            parts.push(format!("App: {}", title_case(app)));
        }
        if self.playback != PlaybackState::None {
            parts.push(format!("Playback: {}", self.playback));
        }
        if let Some(ref title) = self.media_title {
            parts.push(format!("Title: {title}"));
        }
        parts.join(", ")
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One media-session snapshot, used only for change detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlaybackSample {
    pub state: Option<u32>,
    /// Position in milliseconds.
    pub position: Option<u64>,
    pub speed: Option<f64>,
}

impl PlaybackSample {
    pub fn playback(&self) -> PlaybackState {
        self.state.map_or(PlaybackState::None, PlaybackState::from_code)
    }

    pub fn is_playing(&self) -> bool {
        self.playback() == PlaybackState::Playing
    }
}

/// Music-stream volume and mute flag, from the audio service dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VolumeReading {
    pub level: Option<u32>,
    pub muted: Option<bool>,
}
