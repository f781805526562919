//! IoFrame allocator
//!
//! The pool tracks two resources: the number of frames outstanding and the
//! free list of segments. Both live behind one `critical_section::Mutex`, so
//! every operation is a single short critical section and nothing ever
//! blocks.
//!
//! The process-wide pool is reached through [`frame_pool`]. It is built on
//! first use from a static segment arena and lives for the rest of the
//! program. Tests and tools may build private pools over their own
//! `&'static mut` storage with [`FramePool::new`].

use core::cell::{Cell, RefCell};
use core::fmt;

use critical_section::Mutex;
use heapless::Vec;
use static_cell::{ConstStaticCell, StaticCell};

use super::frame::IoFrame;
use super::segment::Segment;
use super::{PoolError, PoolResult};
use crate::config::{FRAME_COUNT, MAX_FRAME_SEGMENTS, SEGMENT_COUNT};

struct PoolState {
    segments: Vec<&'static mut Segment, SEGMENT_COUNT>,
    outstanding: usize,
}

/// Fixed-capacity frame allocator
pub struct FramePool {
    state: Mutex<RefCell<PoolState>>,
    frame_capacity: usize,
    segment_capacity: usize,
}

impl FramePool {
    /// Create a pool over caller-provided segment storage
    ///
    /// At most [`SEGMENT_COUNT`] segments are taken from `storage`; any
    /// beyond that are left unused.
    #[must_use]
    pub fn new(storage: &'static mut [Segment], frame_capacity: usize) -> Self {
        let mut segments = Vec::new();
        for segment in storage {
            segment.clear();
            if segments.push(segment).is_err() {
                break;
            }
        }
        let segment_capacity = segments.len();

        Self {
            state: Mutex::new(RefCell::new(PoolState {
                segments,
                outstanding: 0,
            })),
            frame_capacity,
            segment_capacity,
        }
    }

    /// Try to acquire a frame
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] when `capacity()` frames are already
    /// outstanding. Pool state is unchanged in that case.
    pub fn try_acquire(&'static self) -> PoolResult<IoFrame> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if state.outstanding >= self.frame_capacity {
                return Err(PoolError::Exhausted);
            }
            state.outstanding += 1;
            Ok(())
        })?;
        Ok(IoFrame::new(self))
    }

    /// Acquire a frame
    ///
    /// # Panics
    ///
    /// Running out of frames means a consumer is not returning them, which
    /// is unrecoverable at this layer.
    pub fn acquire(&'static self) -> IoFrame {
        match self.try_acquire() {
            Ok(frame) => frame,
            Err(error) => panic!("{}", error),
        }
    }

    /// Maximum frames outstanding at once
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.frame_capacity
    }

    /// Frames that can still be acquired
    #[must_use]
    pub fn available(&self) -> usize {
        self.frame_capacity.saturating_sub(self.outstanding())
    }

    /// Frames currently held by consumers
    #[must_use]
    pub fn outstanding(&self) -> usize {
        critical_section::with(|cs| self.state.borrow_ref(cs).outstanding)
    }

    /// Segments managed by the pool
    #[must_use]
    pub const fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    /// Segments on the free list
    #[must_use]
    pub fn free_segments(&self) -> usize {
        critical_section::with(|cs| self.state.borrow_ref(cs).segments.len())
    }

    pub(crate) fn take_segment(&self) -> Option<&'static mut Segment> {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).segments.pop())
    }

    pub(crate) fn give_segment(&self, segment: &'static mut Segment) {
        segment.clear();
        critical_section::with(|cs| {
            // Only segments that came from this pool are returned, so the
            // free list always has room.
            let _ = self.state.borrow_ref_mut(cs).segments.push(segment);
        });
    }

    /// Return a frame's segments and its slot
    pub(crate) fn recycle(&self, segments: &mut Vec<&'static mut Segment, MAX_FRAME_SEGMENTS>) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            while let Some(segment) = segments.pop() {
                segment.clear();
                let _ = state.segments.push(segment);
            }
            state.outstanding = state.outstanding.saturating_sub(1);
        });
    }
}

impl fmt::Debug for FramePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramePool")
            .field("capacity", &self.frame_capacity)
            .field("outstanding", &self.outstanding())
            .field("free_segments", &self.free_segments())
            .finish()
    }
}

static SEGMENTS: ConstStaticCell<[Segment; SEGMENT_COUNT]> =
    ConstStaticCell::new([Segment::EMPTY; SEGMENT_COUNT]);
static POOL: StaticCell<FramePool> = StaticCell::new();
static INSTANCE: Mutex<Cell<Option<&'static FramePool>>> = Mutex::new(Cell::new(None));

/// The process-wide frame pool
///
/// Initialized on first call and never torn down.
pub fn frame_pool() -> &'static FramePool {
    critical_section::with(|cs| {
        let instance = INSTANCE.borrow(cs);
        if let Some(pool) = instance.get() {
            return pool;
        }
        let pool: &'static FramePool = POOL.init(FramePool::new(SEGMENTS.take(), FRAME_COUNT));
        instance.set(Some(pool));
        pool
    })
}

/// Acquire a frame from the process-wide pool
///
/// # Panics
///
/// Panics when [`FRAME_COUNT`] frames are already outstanding.
#[must_use]
pub fn acquire() -> IoFrame {
    frame_pool().acquire()
}

/// Return a frame to the pool it came from
pub fn release(frame: IoFrame) {
    frame.release();
}
