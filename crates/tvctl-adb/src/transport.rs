// Process transport for the debug bridge.
//
// Every call spawns a fresh `adb` process: there is no persistent
// connection, so the transport must tolerate rapid, redundant invocation.
// The `ShellTransport` trait is the only seam between core logic and the
// operating system; tests swap in scripted implementations.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::Error;
use crate::output::{CommandOutput, SENTINEL_EXIT};

/// Executes bridge commands against an addressed device.
#[async_trait]
pub trait ShellTransport: Send + Sync {
    /// Run `adb -s <serial> <args...>` and capture its output.
    ///
    /// A timeout is reported as [`CommandOutput::timed_out`], not as an error.
    async fn run(
        &self,
        serial: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, Error>;

    /// Run a server-level command that is not scoped to a device
    /// (for example `adb connect host:port`).
    async fn run_global(&self, args: &[String], timeout: Duration)
    -> Result<CommandOutput, Error>;
}

/// Shared transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Path to (or name of) the `adb` binary.
    pub adb_path: PathBuf,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
        }
    }
}

/// Spawns the real `adb` binary.
#[derive(Debug, Clone)]
pub struct AdbTransport {
    config: TransportConfig,
}

impl AdbTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn spawn(&self, argv: Vec<String>, timeout: Duration) -> Result<CommandOutput, Error> {
        let program = self.config.adb_path.display().to_string();
        debug!(%program, ?argv, timeout_ms = timeout.as_millis(), "spawning adb");

        let mut child = Command::new(&self.config.adb_path)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn { program, source })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes while waiting so a chatty child never blocks on a full pipe.
        let finished = tokio::time::timeout(timeout, async {
            let (out, err, status) = tokio::join!(drain(stdout), drain(stderr), child.wait());
            Ok::<_, std::io::Error>((out?, err?, status?))
        })
        .await;

        match finished {
            Ok(Ok((out, err, status))) => Ok(CommandOutput::new(
                out,
                String::from_utf8_lossy(&err).into_owned(),
                status.code().unwrap_or(SENTINEL_EXIT),
            )),
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => {
                warn!(?argv, "adb command timed out, killing process");
                // kill() also reaps, so nothing is left behind once we return
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to kill timed-out adb process");
                }
                Ok(CommandOutput::timed_out())
            }
        }
    }
}

impl Default for AdbTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

#[async_trait]
impl ShellTransport for AdbTransport {
    async fn run(
        &self,
        serial: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, Error> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push("-s".to_owned());
        argv.push(serial.to_owned());
        argv.extend(args.iter().cloned());
        self.spawn(argv, timeout).await
    }

    async fn run_global(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, Error> {
        self.spawn(args.to_vec(), timeout).await
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
