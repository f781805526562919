//! Soft-bit framer
//!
//! Accumulates soft dibits until a full frame of `N` soft bits is available.

use crate::types::SoftDibit;

/// Fixed-length soft-bit accumulator
#[derive(Clone, Debug)]
pub struct Framer<const N: usize> {
    buffer: [i8; N],
    index: usize,
}

impl<const N: usize> Framer<N> {
    /// Create an empty framer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            index: 0,
        }
    }

    /// Append one symbol's soft bits
    ///
    /// Returns the completed frame when the `N`th bit lands. The next push
    /// starts a new frame.
    pub fn push(&mut self, dibit: SoftDibit) -> Option<&[i8; N]> {
        for bit in dibit {
            if self.index < N {
                self.buffer[self.index] = bit;
                self.index += 1;
            }
        }
        if self.index >= N {
            self.index = 0;
            Some(&self.buffer)
        } else {
            None
        }
    }

    /// Soft bits collected toward the current frame
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.index
    }

    /// Discard any partial frame
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.index = 0;
    }
}

impl<const N: usize> Default for Framer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn emits_after_n_bits() {
        let mut framer = Framer::<6>::new();
        assert!(framer.push([1, -1]).is_none());
        assert!(framer.push([2, -2]).is_none());
        let frame = framer.push([3, -3]).copied();
        assert_eq!(frame, Some([1, -1, 2, -2, 3, -3]));
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn reset_discards_partial_frame() {
        let mut framer = Framer::<4>::new();
        framer.push([7, 7]);
        framer.reset();
        assert_eq!(framer.pending(), 0);
        assert!(framer.push([1, 1]).is_none());
    }
}
