// ── Command executor ──
//
// Runs one bridge command against a configured device. Timeouts come back
// from the transport as a `CommandOutput` with the sentinel exit code and are
// never retried. Transient transport failures are retried with linear
// backoff; every other non-zero exit is returned as-is.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use tvctl_adb::{CommandOutput, ShellTransport};

use crate::config::RetryPolicy;
use crate::error::CoreError;
use crate::model::{Device, DeviceRegistry};

/// Error-text fragments that mark a failure as worth retrying.
const TRANSIENT_MARKERS: &[&str] = &[
    "device offline",
    "device not found",
    "connection refused",
    "connection reset",
    "broken pipe",
];

/// Whether `stderr` describes a transient transport failure.
pub fn is_transient(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Per-call overrides for the executor defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
}

impl ExecOptions {
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            retries: None,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// Dispatches commands to devices by identifier.
#[derive(Clone)]
pub struct CommandExecutor {
    transport: Arc<dyn ShellTransport>,
    registry: Arc<DeviceRegistry>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CommandExecutor {
    pub fn new(
        transport: Arc<dyn ShellTransport>,
        registry: Arc<DeviceRegistry>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            registry,
            timeout,
            retry,
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &Arc<dyn ShellTransport> {
        &self.transport
    }

    /// Run `args` against the device named `device_id`.
    ///
    /// Unknown identifiers and a missing `adb` binary are errors; every
    /// other outcome, including timeouts, is a `CommandOutput`.
    pub async fn exec(
        &self,
        device_id: &str,
        args: &[&str],
        opts: ExecOptions,
    ) -> Result<CommandOutput, CoreError> {
        let device = self.registry.get(device_id)?;
        self.exec_on(&device, args, opts).await
    }

    /// Convenience for `adb shell <command>`.
    pub async fn shell(
        &self,
        device: &Device,
        command: &str,
        opts: ExecOptions,
    ) -> Result<CommandOutput, CoreError> {
        self.exec_on(device, &["shell", command], opts).await
    }

    /// Run `args` against an already-resolved device.
    pub async fn exec_on(
        &self,
        device: &Device,
        args: &[&str],
        opts: ExecOptions,
    ) -> Result<CommandOutput, CoreError> {
        let serial = device.serial();
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        let timeout = opts.timeout.unwrap_or(self.timeout);
        let retries = opts.retries.unwrap_or(self.retry.max_retries);

        let mut last_error = String::new();
        for attempt in 0..=retries {
            if attempt > 0 {
                let delay = self.retry.backoff(attempt);
                warn!(
                    device = %device.id,
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %last_error,
                    "transient adb failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            debug!(device = %device.id, %serial, ?args, attempt, "dispatching adb command");
            let output = self.transport.run(&serial, &args, timeout).await?;

            if output.timed_out {
                warn!(device = %device.id, ?args, "adb command timed out");
                return Ok(output);
            }
            if output.success() || !is_transient(&output.stderr) {
                return Ok(output);
            }
            last_error = output.stderr.trim().to_owned();
        }

        Ok(CommandOutput::failed(format!(
            "Failed after {retries} retries: {last_error}"
        )))
    }

    /// Server-level command with no device scope (e.g. `adb connect`).
    pub async fn exec_global(
        &self,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, CoreError> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        debug!(?args, "dispatching global adb command");
        Ok(self.transport.run_global(&args, timeout).await?)
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("devices", &self.registry.len())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tvctl_adb::Error as AdbError;

    use super::*;

    /// Replays canned outputs in order, repeating the last one.
    struct Replay {
        outputs: Mutex<Vec<CommandOutput>>,
        calls: AtomicUsize,
    }

    impl Replay {
        fn new(outputs: Vec<CommandOutput>) -> Arc<Self> {
            Arc::new(Self {
                outputs: Mutex::new(outputs),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ShellTransport for Replay {
        async fn run(
            &self,
            _serial: &str,
            _args: &[String],
            _timeout: Duration,
        ) -> Result<CommandOutput, AdbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outputs = self.outputs.lock().unwrap();
            if outputs.len() > 1 {
                Ok(outputs.remove(0))
            } else {
                Ok(outputs[0].clone())
            }
        }

        async fn run_global(
            &self,
            _args: &[String],
            _timeout: Duration,
        ) -> Result<CommandOutput, AdbError> {
            Ok(CommandOutput::new(Vec::new(), String::new(), 0))
        }
    }

    fn executor(transport: Arc<Replay>) -> CommandExecutor {
        let registry = DeviceRegistry::new([Device::new("den", "10.0.0.5", 5555, "Den")]).unwrap();
        CommandExecutor::new(
            transport,
            Arc::new(registry),
            Duration::from_secs(10),
            RetryPolicy::default(),
        )
    }

    fn failure(stderr: &str) -> CommandOutput {
        CommandOutput::new(Vec::new(), stderr.to_owned(), 1)
    }

    #[test]
    fn transient_markers_are_case_insensitive() {
        assert!(is_transient("error: Device Offline"));
        assert!(is_transient("adb: connect failed: Connection refused"));
        assert!(!is_transient("Error: unknown keycode"));
        assert!(!is_transient(""));
    }

    #[tokio::test(start_paused = true)]
    async fn device_offline_retries_until_budget_exhausted() {
        let transport = Replay::new(vec![failure("error: device offline")]);
        let exec = executor(Arc::clone(&transport));

        let started = tokio::time::Instant::now();
        let out = exec.exec("den", &["shell", "true"], ExecOptions::default()).await.unwrap();

        assert_eq!(transport.calls(), 3);
        assert_eq!(out.exit_code, -1);
        assert!(out.stderr.starts_with("Failed after 2 retries:"));
        assert!(out.stderr.contains("device offline"));
        // 0.5s + 1.0s of linear backoff.
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_then_success() {
        let ok = CommandOutput::new(b"done".to_vec(), String::new(), 0);
        let transport = Replay::new(vec![failure("error: device not found"), ok]);
        let exec = executor(Arc::clone(&transport));

        let out = exec.exec("den", &["shell", "true"], ExecOptions::default()).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(out.success());
        assert_eq!(out.stdout_text(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn deterministic_failure_is_not_retried() {
        let transport = Replay::new(vec![failure("Error: unknown keycode")]);
        let exec = executor(Arc::clone(&transport));

        let out = exec
            .exec("den", &["shell", "input", "keyevent", "BOGUS"], ExecOptions::default())
            .await
            .unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.stderr, "Error: unknown keycode");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_not_retried() {
        let transport = Replay::new(vec![CommandOutput::timed_out()]);
        let exec = executor(Arc::clone(&transport));

        let out = exec.exec("den", &["shell", "dumpsys"], ExecOptions::default()).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(out.timed_out);
        assert_eq!(out.exit_code, -1);
    }

    #[tokio::test(start_paused = true)]
    async fn per_call_retry_override() {
        let transport = Replay::new(vec![failure("broken pipe")]);
        let exec = executor(Arc::clone(&transport));

        let out = exec
            .exec("den", &["shell", "true"], ExecOptions::default().with_retries(0))
            .await
            .unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(out.stderr.starts_with("Failed after 0 retries"));
    }

    #[tokio::test]
    async fn unknown_device_is_config_error() {
        let transport = Replay::new(vec![failure("")]);
        let exec = executor(Arc::clone(&transport));

        let err = exec.exec("attic", &["shell", "true"], ExecOptions::default()).await.unwrap_err();

        assert!(matches!(err, CoreError::UnknownDevice { .. }));
        assert!(err.is_config());
        assert_eq!(transport.calls(), 0);
    }
}
