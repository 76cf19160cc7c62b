use crate::{ConnectionConfig, Frame};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("IO Error: {0}")]
    Io(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Connection closed")]
    Closed,
}

impl TransportError {
    /// True for failures that happened while establishing the connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, TransportError::ConnectionFailed(_))
    }

    /// The underlying cause without the category prefix, for status lines.
    pub fn detail(&self) -> String {
        match self {
            TransportError::ConnectionFailed(detail) | TransportError::Io(detail) => {
                detail.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result of one bounded wait for a line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// A complete newline-terminated line.
    Line(Frame),
    /// No complete line arrived within the timeout. Not an error.
    Timeout,
}

/// A byte-oriented connection that yields newline-terminated lines.
///
/// All methods take `&self` so that [`LineSource::close`] can be called from
/// the foreground while the background reader is blocked in
/// [`LineSource::read_line`]; implementations must make that close observable
/// to the reader promptly.
pub trait LineSource: Send + Sync {
    /// Open the underlying device. Fails with
    /// [`TransportError::ConnectionFailed`] if it cannot be opened or is
    /// already open.
    fn open(&self, config: &ConnectionConfig) -> Result<(), TransportError>;

    /// Block for at most `timeout` waiting for a complete line.
    fn read_line(&self, timeout: Duration) -> Result<ReadOutcome, TransportError>;

    /// Close the connection. Idempotent: returns `true` only for the call
    /// that actually closed an open connection.
    fn close(&self) -> bool;

    fn is_open(&self) -> bool;
}
