//! Frame decoder contract
//!
//! The demodulator hands each complete soft-bit frame to a [`FrameDecoder`]
//! together with the pool to build output from. Forward error correction
//! and frame-type classification live behind this trait.

use crate::config::FRAME_BITS;
use crate::hdlc::{FrameKind, FramePool, IoFrame};

/// Result of decoding one frame
#[derive(Debug)]
pub struct Decoded {
    /// Output frame, if the decoder produced one
    pub frame: Option<IoFrame>,
    /// Whether the frame passed validation
    pub valid: bool,
    /// Bit errors corrected or detected
    pub bit_errors: u32,
}

impl Decoded {
    /// A failed decode with no output
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            frame: None,
            valid: false,
            bit_errors: 0,
        }
    }
}

/// Soft-decision frame decoder
pub trait FrameDecoder {
    /// Decode one frame of soft bits
    fn decode(&mut self, buffer: &[i8; FRAME_BITS], pool: &'static FramePool) -> Decoded;

    /// Drop any inter-frame state (e.g. a partially received superframe)
    fn reset(&mut self);
}

/// Bytes produced by [`HardDecisionDecoder`]
pub const HARD_FRAME_BYTES: usize = FRAME_BITS / 8;

/// Slices soft bits to bytes without error correction
///
/// Bits are packed MSB first; a positive soft value is a 1. Every frame is
/// reported valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct HardDecisionDecoder {
    frames: u32,
}

impl HardDecisionDecoder {
    /// Create a decoder
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: 0 }
    }

    /// Frames decoded since the last reset
    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.frames
    }
}

/// Pack soft bits into bytes, MSB first
#[must_use]
pub fn pack_bits(buffer: &[i8; FRAME_BITS]) -> [u8; HARD_FRAME_BYTES] {
    let mut bytes = [0u8; HARD_FRAME_BYTES];
    for (byte, bits) in bytes.iter_mut().zip(buffer.chunks_exact(8)) {
        *byte = bits
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit > 0));
    }
    bytes
}

impl FrameDecoder for HardDecisionDecoder {
    fn decode(&mut self, buffer: &[i8; FRAME_BITS], pool: &'static FramePool) -> Decoded {
        let mut frame = pool.acquire();
        frame.set_kind(FrameKind::Raw);
        if let Err(error) = frame.extend_from_slice(&pack_bits(buffer)) {
            warn!("decoder: {}", error);
            frame.release();
            return Decoded::invalid();
        }

        self.frames = self.frames.wrapping_add(1);
        Decoded {
            frame: Some(frame),
            valid: true,
            bit_errors: 0,
        }
    }

    fn reset(&mut self) {
        self.frames = 0;
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hdlc::Segment;

    fn pool(segments: usize) -> &'static FramePool {
        let storage = std::vec![Segment::EMPTY; segments].leak();
        Box::leak(Box::new(FramePool::new(storage, 2)))
    }

    #[test]
    fn packs_msb_first() {
        let mut buffer = [-7i8; FRAME_BITS];
        buffer[0] = 7;
        buffer[15] = 3;
        let bytes = pack_bits(&buffer);
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[1], 0x01);
        assert!(bytes[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_soft_value_is_a_zero_bit() {
        let buffer = [0i8; FRAME_BITS];
        assert!(pack_bits(&buffer).iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_builds_raw_frame() {
        let pool = pool(4);
        let mut decoder = HardDecisionDecoder::new();
        let decoded = decoder.decode(&[7; FRAME_BITS], pool);
        assert!(decoded.valid);
        assert_eq!(decoded.bit_errors, 0);

        let frame = decoded.frame.unwrap();
        assert_eq!(frame.kind(), FrameKind::Raw);
        assert_eq!(frame.len(), HARD_FRAME_BYTES);
        assert!(frame.iter().all(|b| b == 0xFF));
        assert_eq!(decoder.frames(), 1);
    }

    #[test]
    fn segment_shortage_is_reported_invalid() {
        let pool = pool(1);
        let mut decoder = HardDecisionDecoder::new();
        let decoded = decoder.decode(&[7; FRAME_BITS], pool);
        assert!(!decoded.valid);
        assert!(decoded.frame.is_none());
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.free_segments(), 1);
    }
}
