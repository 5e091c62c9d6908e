// Result of one bridge invocation.

use std::borrow::Cow;

use bytes::Bytes;

/// Exit status reported when the process was killed on timeout, or when a
/// retry budget ran out without a usable exit code.
pub const SENTINEL_EXIT: i32 = -1;

/// Captured output of a single bridge command.
///
/// Never discarded by callers: success is decided by inspecting
/// `exit_code`, `timed_out` and, for transient failures, `stderr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Raw stdout. Kept as bytes because `exec-out screencap` streams PNG data.
    pub stdout: Bytes,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<Bytes>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            timed_out: false,
        }
    }

    /// The distinguished timeout result.
    pub fn timed_out() -> Self {
        Self {
            stdout: Bytes::new(),
            stderr: "Command timed out".into(),
            exit_code: SENTINEL_EXIT,
            timed_out: true,
        }
    }

    /// A failure that never produced a process exit code.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self::new(Bytes::new(), stderr, SENTINEL_EXIT)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// Stdout decoded as UTF-8 (lossy).
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_is_not_success() {
        let out = CommandOutput::timed_out();
        assert!(!out.success());
        assert_eq!(out.exit_code, SENTINEL_EXIT);
        assert_eq!(out.stderr, "Command timed out");
    }

    #[test]
    fn stdout_text_is_lossy() {
        let out = CommandOutput::new(vec![b'o', b'k', 0xff], "", 0);
        assert!(out.success());
        assert_eq!(out.stdout_text(), "ok\u{fffd}");
    }
}
