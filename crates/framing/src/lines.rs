use crate::Framer;
use core_types::Frame;

/// Buffers input and emits a frame whenever `\n` is encountered.
///
/// The terminator (and any `\r` before it) stays in the frame; the tag
/// normalizer trims it. Bytes after the last `\n` are kept until a later push
/// completes the line.
pub struct LineFramer {
    buffer: Vec<u8>,
    // Timestamp of the chunk that delivered the first byte of the current line.
    start_timestamp_us: Option<u64>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
            start_timestamp_us: None,
        }
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for LineFramer {
    fn push(&mut self, bytes: &[u8], timestamp_us: u64) -> Vec<Frame> {
        let mut frames = Vec::new();

        for line in bytes.split_inclusive(|&b| b == b'\n') {
            if self.buffer.is_empty() {
                self.start_timestamp_us = Some(timestamp_us);
            }
            self.buffer.extend_from_slice(line);

            if line.last() == Some(&b'\n') {
                let ts = self.start_timestamp_us.take().unwrap_or(timestamp_us);
                frames.push(Frame::new(std::mem::take(&mut self.buffer), ts));
            }
        }

        frames
    }

    fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.start_timestamp_us = None;
    }

    fn name(&self) -> &'static str {
        "Lines"
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_simple() {
        let mut framer = LineFramer::new();
        let frames = framer.push(b"E200\nE201\n", 100);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].bytes, b"E200\n");
        assert_eq!(frames[0].timestamp_us, 100);
        assert_eq!(frames[1].bytes, b"E201\n");
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_lines_split() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"E20", 100).is_empty());
        assert_eq!(framer.pending(), 3);

        let frames = framer.push(b"0 extra\n", 200);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, b"E200 extra\n");
        // The line is stamped with the chunk it started in.
        assert_eq!(frames[0].timestamp_us, 100);
    }

    #[test]
    fn test_tail_starts_new_line_with_current_timestamp() {
        let mut framer = LineFramer::new();
        let frames = framer.push(b"A\nB", 100);
        assert_eq!(frames.len(), 1);

        let frames = framer.push(b"C\n", 300);
        assert_eq!(frames[0].bytes, b"BC\n");
        assert_eq!(frames[0].timestamp_us, 100);
    }

    #[test]
    fn test_crlf_preserved() {
        let mut framer = LineFramer::new();
        let frames = framer.push(b"Test\r\n", 100);
        assert_eq!(frames[0].bytes, b"Test\r\n");
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut framer = LineFramer::new();
        framer.push(b"partial", 1);
        framer.reset();
        let frames = framer.push(b"next\n", 2);
        assert_eq!(frames[0].bytes, b"next\n");
        assert_eq!(frames[0].timestamp_us, 2);
    }
}
