//! Frame Pool
//!
//! Decoded frames are built from fixed-size [`Segment`]s carved out of a
//! static arena. The [`FramePool`] hands out [`IoFrame`] handles that pull
//! segments on demand and return them when released.
//!
//! - No general-purpose allocator is ever involved
//! - Free lists are mutated only inside `critical_section::with`, so a frame
//!   may be released from a different interrupt priority than it was
//!   acquired from
//! - Each frame has exactly one owner; handing it on is a move

pub mod frame;
pub mod pool;
pub mod segment;

pub use frame::{FrameKind, IoFrame};
pub use pool::{acquire, frame_pool, release, FramePool};
pub use segment::Segment;

use core::fmt;

/// Frame pool error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// Every frame is outstanding
    Exhausted,
    /// No free segment to grow a frame's payload
    SegmentsExhausted,
    /// The frame already holds its maximum number of segments
    FrameFull,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "frame pool exhausted"),
            Self::SegmentsExhausted => write!(f, "segment pool exhausted"),
            Self::FrameFull => write!(f, "frame payload full"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PoolError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Exhausted => defmt::write!(f, "frame pool exhausted"),
            Self::SegmentsExhausted => defmt::write!(f, "segment pool exhausted"),
            Self::FrameFull => defmt::write!(f, "frame payload full"),
        }
    }
}

/// Frame pool operation result
pub type PoolResult<T> = Result<T, PoolError>;
