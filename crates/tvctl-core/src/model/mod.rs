// ── Domain model ──
//
// Canonical types shared by every component: configured devices, inferred
// status, and the typed actions callers can request.

pub mod action;
pub mod device;
pub mod status;

pub use action::{
    ActionResult, DeviceReachability, NavAction, Reachability, ScreenCapture, StreamingApp,
    VolumeAction, parse_action,
};
pub use device::{DEFAULT_ADB_PORT, Device, DeviceId, DevicePlatform, DeviceRegistry};
pub use status::{DeviceStatus, PlaybackSample, PlaybackState, ScreenState, VolumeReading};
