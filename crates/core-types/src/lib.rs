use serde::{Deserialize, Serialize};

pub mod config;
pub mod token;
pub mod transport;

pub use config::{BaudRate, ConfigError, ConnectionConfig};
pub use token::TagToken;
pub use transport::{LineSource, ReadOutcome, TransportError};

/// A raw chunk of logical data (one line as emitted by the reader).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// The raw bytes comprising this frame, terminator included.
    pub bytes: Vec<u8>,
    /// Timestamp in microseconds relative to connection open.
    pub timestamp_us: u64,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, timestamp_us: u64) -> Self {
        Self {
            bytes,
            timestamp_us,
        }
    }

    /// Frame contents as text. Invalid UTF-8 is replaced, never rejected.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Trait for converting Frames into structured values.
///
/// Implemented by protocol interpreters; returning `None` means the frame
/// carries nothing this decoder recognises.
pub trait Decoder: Send {
    type Output;

    /// Attempt to interpret a frame.
    fn ingest(&mut self, frame: &Frame) -> Option<Self::Output>;

    /// Get the unique name of this decoder (e.g., "tag").
    fn id(&self) -> &'static str;

    /// Get a human-readable name.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_serialization() {
        let frame = Frame::new(b"E200\n".to_vec(), 1000);
        let json = serde_json::to_string(&frame).unwrap();
        let deserialized: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, deserialized);
    }

    #[test]
    fn test_frame_text_is_lossy() {
        let frame = Frame::new(vec![b'A', 0xFF, b'B'], 0);
        assert_eq!(frame.text(), "A\u{FFFD}B");
    }
}
