// Media-session samples and audio-service volume.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{PlaybackSample, VolumeReading};

struct SampleRegexes {
    block: Regex,
    state: Regex,
    position: Regex,
    speed: Regex,
}

fn sample_regexes() -> Option<&'static SampleRegexes> {
    static REGEXES: OnceLock<Option<SampleRegexes>> = OnceLock::new();
    REGEXES
        .get_or_init(|| {
            Some(SampleRegexes {
                block: Regex::new(r"state=PlaybackState\s*\{[^}]*\}").ok()?,
                state: Regex::new(r"\bstate=(\d+)").ok()?,
                position: Regex::new(r"[{,]\s*position=(-?\d+)").ok()?,
                speed: Regex::new(r"[{,]\s*speed=(-?[0-9.]+)").ok()?,
            })
        })
        .as_ref()
}

/// Parse one playback sample from a full `dumpsys media_session` dump.
///
/// The first session reporting `playing` is preferred; otherwise the first
/// session found. A negative position means "unknown" on this platform.
pub fn parse_playback_sample(dump: &str) -> PlaybackSample {
    let Some(re) = sample_regexes() else {
        return PlaybackSample::default();
    };

    let samples: Vec<PlaybackSample> = re
        .block
        .find_iter(dump)
        .map(|block| {
            let block = block.as_str();
            let capture = |r: &Regex| {
                r.captures(block)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_owned())
            };
            PlaybackSample {
                state: capture(&re.state).and_then(|s| s.parse().ok()),
                position: capture(&re.position).and_then(|s| s.parse::<u64>().ok()),
                speed: capture(&re.speed).and_then(|s| s.parse().ok()),
            }
        })
        .collect();

    samples
        .iter()
        .find(|s| s.is_playing())
        .or_else(|| samples.first())
        .copied()
        .unwrap_or_default()
}

fn volume_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"(?is)STREAM_MUSIC.*?index[=:]\s*(\d+)").ok())
        .as_ref()
}

/// Parse the music-stream volume index and the mute flag.
pub fn parse_volume(dump: &str) -> VolumeReading {
    let level = volume_regex()
        .and_then(|re| re.captures(dump))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let lower = dump.to_ascii_lowercase();
    let muted = if lower.contains("muted=true") || lower.contains("muted: true") {
        Some(true)
    } else if lower.contains("muted=false") || lower.contains("muted: false") {
        Some(false)
    } else {
        None
    };

    VolumeReading { level, muted }
}
