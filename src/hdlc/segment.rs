//! Frame segments
//!
//! A segment is a fixed block of payload bytes with a fill level. Frames
//! chain segments together; the pool keeps the unused ones on a free list.

use crate::config::SEGMENT_SIZE;

/// Fixed-size block of frame payload
#[derive(Clone, Debug)]
pub struct Segment {
    data: [u8; SEGMENT_SIZE],
    len: usize,
}

impl Segment {
    /// An empty segment, for initializing static storage
    pub const EMPTY: Self = Self {
        data: [0; SEGMENT_SIZE],
        len: 0,
    };

    /// Append a byte, returns false if the segment is full
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.len] = byte;
        self.len += 1;
        true
    }

    /// Remove the last byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.data[self.len])
    }

    /// Valid bytes
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Number of valid bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if no bytes are stored
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if no more bytes fit
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len >= SEGMENT_SIZE
    }

    /// Discard contents
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::EMPTY
    }
}
