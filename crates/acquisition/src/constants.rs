//! Centralized configuration constants for tag acquisition
//!
//! Timeouts and names shared by the session, the reader actor and the shell.
//!
//! **Before changing any constant:** read its documentation comment and test
//! against a real reader; the values below are tuned for manually operated
//! handheld/desk RFID readers on USB-serial bridges.

use core_types::BaudRate;
use std::time::Duration;

/// Maximum time one `read_line` call may block
///
/// **Value**: 1 second
///
/// **Rationale**: A stop request is noticed between reads, so this bounds
/// the worst-case stop latency when the line source cannot be interrupted
/// by `close()`. Readers emit one line per tag presentation, so a longer
/// wait buys nothing.
pub const DEFAULT_READ_TIMEOUT: Duration = core_types::ConnectionConfig::DEFAULT_READ_TIMEOUT;

/// [`DEFAULT_READ_TIMEOUT`] in milliseconds, for the `--timeout-ms` flag
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Baud rate preselected by the shell
///
/// **Value**: 9600, the factory setting of common UHF desk readers.
pub const DEFAULT_BAUD: BaudRate = BaudRate::B9600;

/// Name of the background thread running the read loop (visible in debuggers)
pub const ACQUISITION_THREAD_NAME: &str = "tag-acquisition";

/// Status line shown before any session has run
pub const IDLE_STATUS: &str = "Idle";
