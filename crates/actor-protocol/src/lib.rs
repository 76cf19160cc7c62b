//! # Actor Protocol
//!
//! Type-safe message definitions for the tag acquisition system.
//!
//! This crate defines the vocabulary shared by the foreground shell, the
//! reader actor and the background acquisition session. It has no runtime
//! dependencies, making it fully testable in isolation.
//!
//! ## Architecture
//!
//! - **ShellCommand**: Messages from shell → ReaderActor
//! - **SessionEvent**: Messages from acquisition → shell
//! - **SessionEndReason**: Why a session left `Reading`
//! - **SessionState**: FSM state machine (pure logic, no side effects)
//!
//! ## Message Flow
//!
//! ```text
//! Shell → ShellCommand → ReaderActor → AcquisitionSession (background thread)
//!                             ↑                 ↓
//!                      SessionFinished    SessionEvent → Shell
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::ActorError;
pub use messages::{SessionEndReason, SessionEvent, ShellCommand};
pub use state::SessionState;
