// ── Diagnostic dump parsing ──
//
// The platform has no structured status API, so state is scraped from
// `dumpsys` text. The matching rules are brittle and version-sensitive,
// so they sit behind `DumpParser`: callers only ever see the structured
// records, and every field is optional by construction.

mod playback;
mod status;

pub use playback::{parse_playback_sample, parse_volume};
pub use status::{classify_activity, parse_status};

use crate::model::{DeviceStatus, PlaybackSample, VolumeReading};

/// Combined power/focus/media query answered by [`DumpParser::parse_status`].
pub const STATUS_COMMAND: &str = "dumpsys power | grep -E 'mWakefulness'; \
     dumpsys window windows | grep -E 'mCurrentFocus'; \
     dumpsys media_session | grep -E 'state=PlaybackState|description='";

/// Full media-session dump answered by [`DumpParser::parse_playback`].
pub const PLAYBACK_COMMAND: &str = "dumpsys media_session";

/// Focused-window line, compared before/after navigation.
pub const FOCUS_COMMAND: &str = "dumpsys window windows | grep -E 'mCurrentFocus'";

/// Power manager wakefulness, answered by [`DumpParser::parse_status`].
pub const POWER_COMMAND: &str = "dumpsys power | grep mWakefulness";

/// Audio service query answered by [`DumpParser::parse_volume`].
pub const VOLUME_COMMAND: &str = "dumpsys audio | grep -E 'STREAM_MUSIC|muted'";

/// Turns raw shell output into structured device state.
///
/// Implementations must never fail: unrecognised or missing input yields
/// `Unknown`/`None` fields.
pub trait DumpParser: Send + Sync {
    fn parse_status(&self, dump: &str) -> DeviceStatus;

    fn parse_playback(&self, dump: &str) -> PlaybackSample;

    fn parse_volume(&self, dump: &str) -> VolumeReading;

    /// Shell command whose output `parse_status` understands.
    fn status_command(&self) -> &str {
        STATUS_COMMAND
    }

    fn playback_command(&self) -> &str {
        PLAYBACK_COMMAND
    }

    fn volume_command(&self) -> &str {
        VOLUME_COMMAND
    }

    fn focus_command(&self) -> &str {
        FOCUS_COMMAND
    }

    fn power_command(&self) -> &str {
        POWER_COMMAND
    }
}

/// Parser for stock Android TV / Fire OS `dumpsys` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpsysParser;

impl DumpParser for DumpsysParser {
    fn parse_status(&self, dump: &str) -> DeviceStatus {
        parse_status(dump)
    }

    fn parse_playback(&self, dump: &str) -> PlaybackSample {
        parse_playback_sample(dump)
    }

    fn parse_volume(&self, dump: &str) -> VolumeReading {
        parse_volume(dump)
    }
}
