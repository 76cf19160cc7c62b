use core_types::{Decoder, Frame, TagToken};

/// Map one raw reader line to its canonical tag token.
///
/// Only the first whitespace-delimited field counts; everything after it is
/// ignored. The field keeps ASCII letters and digits only and is upper-cased.
/// Lines that leave nothing behind yield `None`; malformed input is never an
/// error.
pub fn normalize(raw: &str) -> Option<TagToken> {
    let first = raw.split_whitespace().next()?;
    let canonical: String = first
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    TagToken::new(canonical)
}

/// Decoder turning reader lines into tag tokens.
#[derive(Debug, Default)]
pub struct TagDecoder {
    lines_seen: u64,
    lines_skipped: u64,
}

impl TagDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// Lines that produced no token (blank or no alphanumerics).
    pub fn lines_skipped(&self) -> u64 {
        self.lines_skipped
    }
}

impl Decoder for TagDecoder {
    type Output = TagToken;

    fn ingest(&mut self, frame: &Frame) -> Option<TagToken> {
        self.lines_seen += 1;
        let token = normalize(&frame.text());
        if token.is_none() {
            self.lines_skipped += 1;
        }
        token
    }

    fn id(&self) -> &'static str {
        "tag"
    }

    fn name(&self) -> &'static str {
        "RFID Tag Line"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token(s: &str) -> Option<String> {
        normalize(s).map(TagToken::into_inner)
    }

    #[test]
    fn test_plain_tag() {
        assert_eq!(
            token("E2000017221101441890A1B3\n").as_deref(),
            Some("E2000017221101441890A1B3")
        );
    }

    #[test]
    fn test_case_folded_and_trailing_fields_ignored() {
        assert_eq!(
            token("  e2000017221101441890a1b3 extra fields\r\n").as_deref(),
            Some("E2000017221101441890A1B3")
        );
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(token("e2-00:17_ab;\n").as_deref(), Some("E20017AB"));
    }

    #[test]
    fn test_blank_lines_yield_nothing() {
        assert_eq!(token(""), None);
        assert_eq!(token("   \n"), None);
        assert_eq!(token("\t\r\n"), None);
    }

    #[test]
    fn test_no_alphanumerics_yield_nothing() {
        assert_eq!(token("!!!-###\n"), None);
        // The second field is never consulted.
        assert_eq!(token("--- E200\n"), None);
    }

    #[test]
    fn test_non_ascii_letters_dropped() {
        assert_eq!(token("ÉTIQ42").as_deref(), Some("TIQ42"));
        assert_eq!(token("ÄÖÜ"), None);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        for raw in ["e200 x", "a-b-c", "  Zz9  ", "E2000017221101441890A1B3"] {
            let first = normalize(raw).unwrap();
            assert_eq!(normalize(first.as_str()), Some(first));
        }
    }

    #[test]
    fn test_decoder_counts_skips() {
        let mut decoder = TagDecoder::new();
        let tag = decoder.ingest(&Frame::new(b"abc123\n".to_vec(), 10));
        assert_eq!(tag.unwrap().as_str(), "ABC123");
        assert!(decoder.ingest(&Frame::new(b"  \n".to_vec(), 20)).is_none());
        assert!(decoder
            .ingest(&Frame::new(vec![0xFF, 0xFE, b'\n'], 30))
            .is_none());
        assert_eq!(decoder.lines_seen(), 3);
        assert_eq!(decoder.lines_skipped(), 2);
        assert_eq!(decoder.id(), "tag");
    }
}
