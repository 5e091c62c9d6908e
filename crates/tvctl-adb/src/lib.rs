// tvctl-adb: Async debug-bridge transport for Android TV devices

pub mod error;
pub mod output;
pub mod transport;

pub use error::Error;
pub use output::{CommandOutput, SENTINEL_EXIT};
pub use transport::{AdbTransport, ShellTransport, TransportConfig};
