//! # Native Transport
//!
//! Line sources backed by native serial ports, plus a scripted source for
//! exercising acquisition sessions without hardware.
//!
//! - [`SerialLineSource`]: cross-platform serial port access (Linux, macOS, Windows)
//! - [`ScriptedLineSource`]: deterministic in-memory source with call counters
//! - [`available_ports`] / [`preferred_port`]: device enumeration for the shell

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod mock;
pub mod serial;

pub use mock::{ScriptStep, ScriptedLineSource};
pub use serial::{available_ports, preferred_port, SerialLineSource, DEFAULT_PORT};
