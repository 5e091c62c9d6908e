// ── Playback verification ──
//
// After a deep link is dispatched the app may land on a details page, a
// profile picker, or straight into playback. The verifier walks a small
// explicit state machine with a single bounded attempt counter, so every
// run terminates and every suspension point has an upper bound.
//
//   Dispatched → AwaitingLoad → Confirming{1..=max_attempts} → Verified | Unverified

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::model::{DeviceStatus, PlaybackSample};

/// Verifier states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum VerifyState {
    /// Deep link has just been issued.
    Dispatched,
    /// Fixed settle delay while the app loads.
    AwaitingLoad,
    /// Bounded confirmation loop; `attempt` is 1-based.
    Confirming { attempt: u32 },
    Verified,
    Unverified,
}

impl VerifyState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Unverified)
    }
}

/// How the target app reacts to a deep link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Lands on a details page; a "select" keypress starts playback
    /// (Netflix, Max, Apple TV+).
    SelectToPlay,
    /// Deep link starts playback by itself (YouTube, generic intents).
    DirectPlayback,
}

/// Timing and attempt bounds, shared by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Wait after dispatch before the first check (select-to-play).
    pub settle_delay: Duration,
    pub max_attempts: u32,
    /// UI settle time after a select keypress.
    pub select_settle: Duration,
    /// Sampling window per attempt (select-to-play).
    pub confirm_window: Duration,
    /// Wait after dispatch before sampling (direct playback).
    pub direct_settle: Duration,
    /// Sampling window for direct playback.
    pub direct_window: Duration,
    /// Extra wait granted once when a profile picker is showing.
    pub profile_grace: Duration,
    pub poll_interval: Duration,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(3),
            max_attempts: 3,
            select_settle: Duration::from_secs(2),
            confirm_window: Duration::from_secs(3),
            direct_settle: Duration::from_secs(2),
            direct_window: Duration::from_secs(10),
            profile_grace: Duration::from_secs(5),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Device access the verifier needs. Implementations must not fail:
/// unreadable state is reported as default/empty values.
#[async_trait]
pub trait PlaybackProbe: Send + Sync {
    /// Guaranteed-fresh status (never served from cache).
    async fn status(&self) -> DeviceStatus;

    async fn sample(&self) -> PlaybackSample;

    async fn press_select(&self);
}

/// Result of one verification run.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutcome {
    /// `Verified` or `Unverified`.
    pub state: VerifyState,
    /// Last known device status.
    pub status: DeviceStatus,
    /// Confirmation attempts started.
    pub attempts: u32,
    pub cancelled: bool,
    /// Every state visited, in order.
    pub trace: Vec<VerifyState>,
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        self.state == VerifyState::Verified
    }
}

/// Drives the verification state machine against a [`PlaybackProbe`].
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    policy: VerificationPolicy,
    cancel: CancellationToken,
}

/// Marker for a run interrupted by its cancellation token.
struct Cancelled;

impl Verifier {
    pub fn new(policy: VerificationPolicy) -> Self {
        Self {
            policy,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    pub async fn run(&self, probe: &dyn PlaybackProbe, mode: VerifyMode) -> VerifyOutcome {
        let mut run = Run {
            state: VerifyState::Dispatched,
            trace: vec![VerifyState::Dispatched],
            last_status: None,
            attempts: 0,
            grace_used: false,
        };

        let finished = self.drive(probe, mode, &mut run).await;
        let cancelled = finished.is_err();

        let status = if cancelled {
            // A cancelled run performs no further device access.
            run.last_status.take().unwrap_or_default()
        } else {
            probe.status().await
        };

        if cancelled {
            debug!(attempts = run.attempts, "verification cancelled");
            run.advance(VerifyState::Unverified);
        } else if run.state == VerifyState::Verified {
            info!(attempts = run.attempts, "playback verified");
        } else {
            debug!(attempts = run.attempts, "playback not verified");
        }

        VerifyOutcome {
            state: run.state,
            status,
            attempts: run.attempts,
            cancelled,
            trace: run.trace,
        }
    }

    async fn drive(
        &self,
        probe: &dyn PlaybackProbe,
        mode: VerifyMode,
        run: &mut Run,
    ) -> Result<(), Cancelled> {
        while !run.state.is_terminal() {
            let next = match run.state {
                VerifyState::Dispatched => VerifyState::AwaitingLoad,
                VerifyState::AwaitingLoad => {
                    let settle = match mode {
                        VerifyMode::SelectToPlay => self.policy.settle_delay,
                        VerifyMode::DirectPlayback => self.policy.direct_settle,
                    };
                    self.sleep(settle).await?;
                    VerifyState::Confirming { attempt: 1 }
                }
                VerifyState::Confirming { attempt } if attempt > self.policy.max_attempts.max(1) => {
                    VerifyState::Unverified
                }
                VerifyState::Confirming { attempt } => {
                    run.attempts = run.attempts.max(attempt);
                    match mode {
                        VerifyMode::DirectPlayback => {
                            if self.confirm(probe, self.policy.direct_window).await? {
                                VerifyState::Verified
                            } else {
                                VerifyState::Unverified
                            }
                        }
                        VerifyMode::SelectToPlay => self.select_attempt(probe, attempt, run).await?,
                    }
                }
                VerifyState::Verified | VerifyState::Unverified => break,
            };
            debug!(from = ?run.state, to = ?next, "verifier transition");
            run.advance(next);
        }
        Ok(())
    }

    async fn select_attempt(
        &self,
        probe: &dyn PlaybackProbe,
        attempt: u32,
        run: &mut Run,
    ) -> Result<VerifyState, Cancelled> {
        let status = self.guard(probe.status()).await?;
        let on_profile_picker = status.is_profile_selection();
        let already_playing = status.is_playing();
        run.last_status = Some(status);

        if on_profile_picker {
            if run.grace_used {
                self.sleep(self.policy.select_settle).await?;
                return Ok(VerifyState::Confirming { attempt: attempt + 1 });
            }
            run.grace_used = true;
            self.sleep(self.policy.profile_grace).await?;
            return Ok(VerifyState::Confirming { attempt });
        }

        // A stale "playing" flag still has to pass the position check, but
        // pressing select on a running player would pause it.
        if !already_playing {
            self.guard(probe.press_select()).await?;
            self.sleep(self.policy.select_settle).await?;
        }

        if self.confirm(probe, self.policy.confirm_window).await? {
            Ok(VerifyState::Verified)
        } else {
            Ok(VerifyState::Confirming { attempt: attempt + 1 })
        }
    }

    /// Poll samples for up to `window`. Succeeds when the session reports
    /// playing and either exposes no position or its position strictly
    /// advanced since the previous playing sample. An explicit zero or
    /// negative speed never confirms.
    async fn confirm(&self, probe: &dyn PlaybackProbe, window: Duration) -> Result<bool, Cancelled> {
        let deadline = Instant::now() + window;
        let mut last_position: Option<u64> = None;

        loop {
            let sample = self.guard(probe.sample()).await?;
            let moving = sample.speed.is_none_or(|s| s > 0.0);

            if sample.is_playing() && moving {
                match (sample.position, last_position) {
                    (None, _) => return Ok(true),
                    (Some(pos), Some(prev)) if pos > prev => return Ok(true),
                    (pos, _) => last_position = pos,
                }
            }

            self.sleep(self.policy.poll_interval).await?;
            if Instant::now() >= deadline {
                return Ok(false);
            }
        }
    }

    async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.guard(tokio::time::sleep(duration)).await
    }

    async fn guard<T>(&self, fut: impl Future<Output = T>) -> Result<T, Cancelled> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}

struct Run {
    state: VerifyState,
    trace: Vec<VerifyState>,
    last_status: Option<DeviceStatus>,
    attempts: u32,
    grace_used: bool,
}

impl Run {
    fn advance(&mut self, next: VerifyState) {
        self.state = next;
        self.trace.push(next);
    }
}
