//! Symbol decisions
//!
//! Hard decisions with an error vector magnitude for the carrier detector,
//! and soft decisions for the framer.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::filter::{BiquadCoeffs, BiquadFilter};
use crate::config::{EVM_A, EVM_B, LLR_BITS};
use crate::types::{SoftDibit, Symbol};

/// Largest soft decision magnitude
pub const LLR_LIMIT: i8 = (1 << (LLR_BITS - 1)) - 1;

/// Hard slicer with smoothed EVM
#[derive(Clone, Copy, Debug)]
pub struct SymbolEvm {
    filter: BiquadFilter,
    evm: f32,
}

impl SymbolEvm {
    /// Create with the shared smoothing biquad
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: BiquadFilter::with_coeffs(BiquadCoeffs::from_ba(EVM_B, EVM_A)),
            evm: 0.0,
        }
    }

    /// Slice one corrected sample, returns the symbol and its instantaneous EVM
    pub fn slice(&mut self, sample: f32) -> (Symbol, f32) {
        let symbol = Symbol::from_level(sample);
        let error = sample - symbol.level();
        let evm = error * error;
        self.evm = self.filter.process(evm);
        (symbol, evm)
    }

    /// Smoothed EVM
    #[must_use]
    pub const fn evm(&self) -> f32 {
        self.evm
    }

    /// Forget history
    pub fn reset(&mut self) {
        self.filter.reset();
        self.evm = 0.0;
    }
}

impl Default for SymbolEvm {
    fn default() -> Self {
        Self::new()
    }
}

/// Soft decisions for one symbol, most significant bit first
///
/// The MSB is the sign (negative levels carry a 1), the LSB separates outer
/// from inner levels (outer carries a 1). Both saturate at ±[`LLR_LIMIT`].
#[must_use]
pub fn llr(sample: f32) -> SoftDibit {
    let s = sample.clamp(-3.0, 3.0);
    let limit = f32::from(LLR_LIMIT);

    let msb = (-s).clamp(-1.0, 1.0) * limit;
    let lsb = (s.abs() - 2.0).clamp(-1.0, 1.0) * limit;

    [msb as i8, lsb as i8]
}
