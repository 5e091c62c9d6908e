// Line-oriented status parsing. The three dump sections arrive in any
// order, so each line is classified on its own.

use crate::model::{DeviceStatus, PlaybackState, ScreenState};

const WAKEFULNESS: &str = "mWakefulness=";
const FOCUS: &str = "mCurrentFocus";
const PLAYBACK: &str = "state=PlaybackState";
const DESCRIPTION: &str = "description=";

/// Parse the combined power / window-focus / media-session dump.
pub fn parse_status(dump: &str) -> DeviceStatus {
    let mut status = DeviceStatus::default();

    for line in dump.lines().map(str::trim) {
        if line.contains(WAKEFULNESS) {
            if let Some(screen) = parse_wakefulness(line) {
                status.screen = screen;
            }
        } else if line.contains(FOCUS) {
            if status.foreground_package.is_none() {
                if let Some((package, activity)) = parse_focus(line) {
                    status.foreground_package = Some(package);
                    status.foreground_activity = Some(activity);
                }
            }
        } else if line.contains(PLAYBACK) {
            let state = parse_playback_code(line);
            if rank(state) > rank(status.playback) {
                status.playback = state;
            }
        } else if status.media_title.is_none() {
            status.media_title = parse_description(line);
        }
    }

    status.context = status.foreground_activity.as_deref().map(classify_activity);
    status
}

fn parse_wakefulness(line: &str) -> Option<ScreenState> {
    if line.contains("Awake") {
        Some(ScreenState::On)
    } else if line.contains("Asleep") {
        Some(ScreenState::Off)
    } else if line.contains("Dreaming") {
        Some(ScreenState::Screensaver)
    } else {
        None
    }
}

/// `mCurrentFocus=Window{1a2b u0 com.netflix.ninja/com.netflix.ninja.MainActivity}`
fn parse_focus(line: &str) -> Option<(String, String)> {
    let token = line
        .split_whitespace()
        .find(|part| part.contains('/') && part.contains('.'))?;
    let full = token.trim_matches(|c| matches!(c, '{' | '}' | ')' | '/'));
    let (package, activity) = full.split_once('/')?;
    if package.is_empty() || activity.is_empty() {
        return None;
    }
    Some((package.to_owned(), activity.to_owned()))
}

fn parse_playback_code(line: &str) -> PlaybackState {
    let Some(idx) = line.find(PLAYBACK) else {
        return PlaybackState::None;
    };
    let rest = &line[idx + PLAYBACK.len()..];
    let Some(pos) = rest.find("state=") else {
        return PlaybackState::None;
    };
    let digits: String = rest[pos + "state=".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits
        .parse()
        .map_or(PlaybackState::None, PlaybackState::from_code)
}

/// With several media sessions, the most active one describes the device.
fn rank(state: PlaybackState) -> u8 {
    match state {
        PlaybackState::Playing => 3,
        PlaybackState::Buffering => 2,
        PlaybackState::Paused => 1,
        PlaybackState::None => 0,
    }
}

fn parse_description(line: &str) -> Option<String> {
    let (_, rest) = line.rsplit_once(DESCRIPTION)?;
    let title = rest.split(',').next().unwrap_or_default().trim();
    if title.is_empty() || title == "null" {
        return None;
    }
    Some(title.to_owned())
}

/// Bucket an activity class name into a coarse, human-facing context.
pub fn classify_activity(activity: &str) -> String {
    let lower = activity.to_ascii_lowercase();
    let bucket = if lower.contains("profile") || lower.contains("who") {
        "profile selection"
    } else if lower.contains("search") {
        "search screen"
    } else if lower.contains("player") || lower.contains("playback") {
        "player"
    } else if lower.contains("browse") || lower.contains("home") {
        "browsing/home"
    } else if lower.contains("detail") {
        "content details"
    } else {
        return activity.replace('.', " ").trim().to_owned();
    };
    bucket.to_owned()
}
