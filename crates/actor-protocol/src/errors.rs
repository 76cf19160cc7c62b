//! Error Handling Guidelines
//!
//! All error messages should follow this format:
//!
//! 1. **What failed**: Describe the operation that failed
//! 2. **Why it failed**: Provide the root cause if known
//! 3. **What to do**: Suggest user action when possible
//!
//! Examples:
//! - ✅ "Failed to open serial port: COM5 is in use by another application. Close it and retry."
//! - ✅ "Cannot clear tags while a session is Reading - stop the session first."
//! - ❌ "Port error" (lacks context and action)
//! - ❌ "Error" (too vague)

use core_types::ConfigError;
use thiserror::Error;

/// Unified error type for reader actor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// State transition was rejected
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Actor received a message it cannot act on in the current state
    #[error("Unexpected message in state {state}: {message}")]
    UnexpectedMessage { state: String, message: String },

    /// Communication channel closed
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<ConfigError> for ActorError {
    fn from(e: ConfigError) -> Self {
        ActorError::Config(e.to_string())
    }
}
