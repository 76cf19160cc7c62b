use crate::state::SessionState;
use core_types::{ConnectionConfig, TagToken};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an acquisition session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEndReason {
    /// Stop was requested by the shell.
    UserStop,
    /// The device could not be opened. Not retried.
    ConnectionError(String),
    /// A read failed after the connection was established. Not retried.
    IoError(String),
}

impl SessionEndReason {
    pub fn is_failure(&self) -> bool {
        !matches!(self, SessionEndReason::UserStop)
    }

    /// Status line shown by the shell once the session has ended.
    pub fn status_text(&self) -> String {
        match self {
            SessionEndReason::UserStop => "Disconnected".to_string(),
            SessionEndReason::ConnectionError(detail) => format!("Cannot open port: {detail}"),
            SessionEndReason::IoError(detail) => format!("Read error: {detail}"),
        }
    }
}

impl fmt::Display for SessionEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEndReason::UserStop => write!(f, "stopped by user"),
            SessionEndReason::ConnectionError(detail) => write!(f, "connection error: {detail}"),
            SessionEndReason::IoError(detail) => write!(f, "I/O error: {detail}"),
        }
    }
}

/// Commands from shell to the reader actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShellCommand {
    /// Open the port and start acquiring tags
    Start { config: ConnectionConfig },

    /// Stop the active session
    Stop,

    /// Start/Stop button: stop when a session is active, start otherwise
    Toggle { config: ConnectionConfig },

    /// Forget all accepted tags (only while no session is reading)
    Clear,

    /// Shell is closing: stop any active session
    Shutdown,
}

/// Events from acquisition to shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A tag was seen for the first time; `count` already includes it
    TagAccepted {
        token: TagToken,
        count: usize,
        timestamp_us: u64,
    },

    /// The session left `Reading` (or never got there)
    SessionEnded { reason: SessionEndReason },

    /// Status message for user display
    StatusChanged { message: String },

    /// Session state has changed
    StateChanged { state: SessionState },

    /// Registry was emptied
    Cleared,

    /// A shell command was rejected
    Error { message: String },
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::BaudRate;

    #[test]
    fn test_shell_command_serialization() {
        let cmd = ShellCommand::Start {
            config: ConnectionConfig::new("COM5", BaudRate::B115200).unwrap(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: ShellCommand = serde_json::from_str(&json).unwrap();

        match deserialized {
            ShellCommand::Start { config } => {
                assert_eq!(config.port, "COM5");
                assert_eq!(config.baud, BaudRate::B115200);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_session_event_serialization() {
        let event = SessionEvent::TagAccepted {
            token: TagToken::new("E2000017221101441890A1B3").unwrap(),
            count: 1,
            timestamp_us: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_end_reason_status_text() {
        assert_eq!(SessionEndReason::UserStop.status_text(), "Disconnected");
        assert_eq!(
            SessionEndReason::IoError("device reports readiness to read but returned no data".into())
                .status_text(),
            "Read error: device reports readiness to read but returned no data"
        );
        assert!(SessionEndReason::ConnectionError("COM5: Access is denied".into()).is_failure());
        assert!(!SessionEndReason::UserStop.is_failure());
    }
}
