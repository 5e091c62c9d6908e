use thiserror::Error;

/// Top-level error type for the `tvctl-adb` crate.
///
/// Only covers failures to *run* the bridge binary. A command that ran and
/// exited non-zero, or that hit its timeout, is reported through
/// [`CommandOutput`](crate::CommandOutput) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The bridge binary could not be started (missing, not executable, ...).
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or waiting on the child process failed.
    #[error("I/O error while talking to adb: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if the bridge binary itself is missing.
    pub fn is_missing_binary(&self) -> bool {
        match self {
            Self::Spawn { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Self::Io(_) => false,
        }
    }
}
