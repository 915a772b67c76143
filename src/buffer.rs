//! Append-only, word-aligned byte accumulation for SPIR-V payloads.

use crate::Id;

/// Append-only little-endian byte buffer, 32-bit word oriented.
///
/// Every push appends a whole number of words, so the buffer never needs
/// padding fixups after the fact. Already-written bytes are never revisited.
#[derive(Clone, Default)]
pub struct WordBuffer {
    bytes: Vec<u8>,
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_words(words: usize) -> Self {
        Self { bytes: Vec::with_capacity(words * 4) }
    }

    /// How many words [`push_str`](Self::push_str) will append for `s`:
    /// the UTF-8 bytes plus a NUL terminator, rounded up to the next word
    /// boundary.
    ///
    /// A byte length that is already a multiple of 4 still gets its
    /// terminator, and with it a whole extra word.
    pub fn str_word_count(s: &str) -> usize {
        s.len() / 4 + 1
    }

    pub fn push_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_id(&mut self, id: Id) {
        self.push_u32(id);
    }

    /// Appends `s` as a `LiteralString`: its UTF-8 bytes, then zero bytes
    /// out to the word boundary, with at least one NUL always present.
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
        let padded = 4 * Self::str_word_count(s);
        self.bytes.resize(self.bytes.len() + padded - s.len(), 0);
    }

    /// Appends pre-encoded words. `bytes` must be word-aligned.
    pub(crate) fn push_words(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len() % 4, 0);
        self.bytes.extend_from_slice(bytes);
    }

    pub fn len_words(&self) -> usize {
        self.bytes.len() / 4
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_word_count_rounds_up_past_the_terminator() {
        for (s, words) in [
            ("hello world", 3),
            ("", 1),
            ("abc", 1),
            ("abcd", 2),
            ("abcdefg", 2),
            ("abcdefgh", 3),
        ] {
            assert_eq!(WordBuffer::str_word_count(s), words, "{s:?}");
        }
    }

    #[test]
    fn push_str_zero_pads_whole_words() {
        let mut buf = WordBuffer::new();
        buf.push_str("helo");
        assert_eq!(buf.as_bytes(), [b'h', b'e', b'l', b'o', 0, 0, 0, 0]);
    }

    #[test]
    fn push_str_always_nul_terminates() {
        for s in ["", "a", "ab", "abc", "abcd", "abcde", "abcdefgh"] {
            let mut buf = WordBuffer::new();
            buf.push_str(s);
            let bytes = buf.as_bytes();
            assert_eq!(bytes.len(), 4 * WordBuffer::str_word_count(s), "{s:?}");
            assert!(bytes.len() > s.len());
            assert!(bytes[s.len()..].iter().all(|&b| b == 0), "{s:?}");
        }
    }

    #[test]
    fn words_are_little_endian() {
        let mut buf = WordBuffer::new();
        buf.push_u32(0x0723_0203);
        buf.push_i32(-1);
        buf.push_f32(1.0);
        assert_eq!(
            buf.as_bytes(),
            [0x03, 0x02, 0x23, 0x07, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x80, 0x3f]
        );
    }
}
