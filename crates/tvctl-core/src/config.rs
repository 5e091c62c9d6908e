// ── Runtime controller configuration ──
//
// Describes *what* to talk to and *how patiently*. Core never touches
// disk: the config crate or a test builds a `ControllerConfig` and hands
// it in.

use std::time::Duration;

use tvctl_adb::TransportConfig;

use crate::model::Device;
use crate::verify::VerificationPolicy;

/// Retry budget for transient transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before retry *n* is `backoff_step * n`.
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff_step: Duration::ZERO,
    };

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_step: Duration::from_millis(500),
        }
    }
}

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub devices: Vec<Device>,
    /// Default per-command timeout.
    pub command_timeout: Duration,
    pub retry: RetryPolicy,
    /// How long a status read may be served from cache.
    pub status_ttl: Duration,
    pub verification: VerificationPolicy,
    pub transport: TransportConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            command_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            status_ttl: Duration::from_secs(2),
            verification: VerificationPolicy::default(),
            transport: TransportConfig::default(),
        }
    }
}
