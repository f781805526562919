//! Pooled frame handle

use core::fmt;

use heapless::Vec;

use super::pool::FramePool;
use super::segment::Segment;
use super::{PoolError, PoolResult};
use crate::config::MAX_FRAME_SEGMENTS;

/// What a frame carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameKind {
    /// Undecoded soft-decision payload
    #[default]
    Raw,
    /// M17 link setup frame
    LinkSetup,
    /// M17 stream frame
    Stream,
    /// M17 packet frame
    Packet,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Raw => defmt::write!(f, "RAW"),
            Self::LinkSetup => defmt::write!(f, "LSF"),
            Self::Stream => defmt::write!(f, "STREAM"),
            Self::Packet => defmt::write!(f, "PACKET"),
        }
    }
}

/// A frame on loan from a [`FramePool`]
///
/// Payload bytes are stored in segments taken from the pool as the frame
/// grows. Dropping the frame (or calling [`IoFrame::release`]) gives the
/// segments and the frame slot back.
pub struct IoFrame {
    pool: &'static FramePool,
    segments: Vec<&'static mut Segment, MAX_FRAME_SEGMENTS>,
    kind: FrameKind,
}

impl IoFrame {
    pub(crate) fn new(pool: &'static FramePool) -> Self {
        Self {
            pool,
            segments: Vec::new(),
            kind: FrameKind::Raw,
        }
    }

    /// Append one payload byte
    ///
    /// # Errors
    ///
    /// [`PoolError::SegmentsExhausted`] if a new segment is needed and the
    /// pool has none, [`PoolError::FrameFull`] if the frame already chains
    /// its maximum number of segments.
    pub fn push(&mut self, byte: u8) -> PoolResult<()> {
        if let Some(last) = self.segments.last_mut() {
            if last.push(byte) {
                return Ok(());
            }
        }
        if self.segments.is_full() {
            return Err(PoolError::FrameFull);
        }

        let segment = self.pool.take_segment().ok_or(PoolError::SegmentsExhausted)?;
        segment.push(byte);
        if let Err(segment) = self.segments.push(segment) {
            self.pool.give_segment(segment);
            return Err(PoolError::FrameFull);
        }
        Ok(())
    }

    /// Append a run of bytes, all or nothing
    ///
    /// # Errors
    ///
    /// Same as [`IoFrame::push`]. On error the frame is left as it was.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> PoolResult<()> {
        let start = self.len();
        for &byte in bytes {
            if let Err(error) = self.push(byte) {
                self.truncate(start);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Shorten the payload, returning emptied segments to the pool
    pub fn truncate(&mut self, len: usize) {
        let mut excess = self.len().saturating_sub(len);
        while excess > 0 {
            let Some(last) = self.segments.last_mut() else {
                break;
            };
            if last.pop().is_some() {
                excess -= 1;
            }
            if last.is_empty() {
                if let Some(segment) = self.segments.pop() {
                    self.pool.give_segment(segment);
                }
            }
        }
    }

    /// Drop the payload but keep the frame
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Payload length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.len()).sum()
    }

    /// Check if the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments currently chained into this frame
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Payload bytes in order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| segment.as_slice().iter().copied())
    }

    /// Copy the payload into `out`, returns the number of bytes written
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let mut written = 0;
        for (dst, src) in out.iter_mut().zip(self.iter()) {
            *dst = src;
            written += 1;
        }
        written
    }

    /// Frame type tag
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Set the frame type tag
    pub fn set_kind(&mut self, kind: FrameKind) {
        self.kind = kind;
    }

    /// Give the frame back to its pool
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for IoFrame {
    fn drop(&mut self) {
        self.pool.recycle(&mut self.segments);
    }
}

impl fmt::Debug for IoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoFrame")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .field("segments", &self.segments.len())
            .finish()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for IoFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "IoFrame({}, {} bytes)", self.kind, self.len());
    }
}
