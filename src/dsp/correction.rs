//! Deviation and frequency-offset correction
//!
//! Both correctors run on the centre sample of each symbol window. Deviation
//! is corrected first (a gain), then frequency offset (a DC shift) on the
//! gain-corrected sample.

use super::filter::{BiquadCoeffs, BiquadFilter};
use crate::config::{EVM_A, EVM_B};
use crate::types::Symbol;

/// Fraction of the current peak a sample must reach to update it
const PEAK_THRESHOLD: f32 = 0.67;

/// Peak tracking rate
const ALPHA: f32 = 0.01;

/// Distance between the outer symbol levels
const OUTER_SPAN: f32 = 6.0;

/// Spans below this are treated as no estimate yet
const MIN_SPAN: f32 = 0.01;

const MIN_FACTOR: f32 = 0.1;
const MAX_FACTOR: f32 = 10.0;

/// Nominal outer peak, the starting point before any symbols are seen
const NOMINAL_PEAK: f32 = 3.0;

/// Largest offset the estimator reports, half the distance between levels
pub const MAX_OFFSET: f32 = 0.5;

/// Deviation estimator
///
/// Tracks the positive and negative outer-symbol peaks and returns the gain
/// that maps them to ±3. Peaks start at the nominal levels so a clean signal
/// is corrected from the first symbol.
#[derive(Clone, Copy, Debug)]
pub struct DeviationError {
    max: f32,
    min: f32,
}

impl DeviationError {
    /// Create an estimator seeded at the nominal peaks
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max: NOMINAL_PEAK,
            min: -NOMINAL_PEAK,
        }
    }

    /// Feed one centre sample, returns the gain correction factor
    pub fn update(&mut self, sample: f32) -> f32 {
        if sample > 0.0 && sample > self.max * PEAK_THRESHOLD {
            self.max += (sample - self.max) * ALPHA;
        } else if sample < 0.0 && sample < self.min * PEAK_THRESHOLD {
            self.min += (sample - self.min) * ALPHA;
        }
        self.factor()
    }

    /// Current gain correction factor
    #[must_use]
    pub fn factor(&self) -> f32 {
        let span = self.max - self.min;
        if span < MIN_SPAN {
            return 1.0;
        }
        (OUTER_SPAN / span).clamp(MIN_FACTOR, MAX_FACTOR)
    }

    /// Return to the nominal peaks
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for DeviationError {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency offset estimator
///
/// Smooths the residual between each sample and its nearest ideal level.
/// The estimate is held within ±`MAX_OFFSET`, otherwise a flat input would
/// be dragged onto a symbol level.
#[derive(Clone, Copy, Debug)]
pub struct FrequencyError {
    filter: BiquadFilter,
    estimate: f32,
}

impl FrequencyError {
    /// Create with the shared smoothing biquad
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: BiquadFilter::with_coeffs(BiquadCoeffs::from_ba(EVM_B, EVM_A)),
            estimate: 0.0,
        }
    }

    /// Feed one deviation-corrected sample, returns the offset to subtract
    pub fn update(&mut self, sample: f32) -> f32 {
        let level = Symbol::from_level(sample).level();
        self.estimate = self
            .filter
            .process(sample - level)
            .clamp(-MAX_OFFSET, MAX_OFFSET);
        self.estimate
    }

    /// Current offset estimate
    #[must_use]
    pub const fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Forget history
    pub fn reset(&mut self) {
        self.filter.reset();
        self.estimate = 0.0;
    }
}

impl Default for FrequencyError {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn no_history_means_unity_gain() {
        assert_eq!(DeviationError::new().factor(), 1.0);
        assert_eq!(DeviationError::default().factor(), 1.0);
    }

    #[test]
    fn nominal_deviation_is_left_alone() {
        let mut dev = DeviationError::new();
        for i in 0..200 {
            let s = if i % 2 == 0 { 3.0 } else { -3.0 };
            assert_eq!(dev.update(s), 1.0);
        }
    }

    #[test]
    fn deviation_converges_to_outer_levels() {
        let mut dev = DeviationError::new();
        let mut factor = 1.0;
        // Over-deviated: outer levels at ±4.5
        for i in 0..2000 {
            let s = if i % 2 == 0 { 4.5 } else { -4.5 };
            factor = dev.update(s);
        }
        assert!((factor - 2.0 / 3.0).abs() < 0.01, "factor {factor}");

        dev.reset();
        assert_eq!(dev.factor(), 1.0);
    }

    #[test]
    fn deviation_follows_mild_under_deviation() {
        let mut dev = DeviationError::new();
        let mut factor = 1.0;
        // Outer levels at ±2.4, still above the update threshold of ±2.01
        for i in 0..3000 {
            let s = if i % 2 == 0 { 2.4 } else { -2.4 };
            factor = dev.update(s);
        }
        assert!((factor - 1.25).abs() < 0.01, "factor {factor}");
    }

    #[test]
    fn deviation_factor_is_bounded() {
        let mut dev = DeviationError::new();
        for _ in 0..5000 {
            dev.update(1000.0);
            dev.update(-1000.0);
        }
        assert!(dev.factor() >= MIN_FACTOR);
    }

    #[test]
    fn frequency_tracks_constant_offset() {
        let mut freq = FrequencyError::new();
        let mut est = 0.0;
        for i in 0..500 {
            let level = Symbol::from_dibit((i % 4) as u8).map_or(1.0, Symbol::level);
            est = freq.update(level + 0.2);
        }
        assert!((est - 0.2).abs() < 0.01, "offset {est}");
        freq.reset();
        assert_eq!(freq.estimate(), 0.0);
    }

    #[test]
    fn frequency_estimate_is_clamped_on_flat_input() {
        let mut freq = FrequencyError::new();
        // Zero sits halfway between -1 and +1, the raw residual is ±1
        for _ in 0..2000 {
            let est = freq.update(0.0);
            assert!(est.abs() <= MAX_OFFSET, "offset {est}");
        }
        assert_eq!(freq.estimate().abs(), MAX_OFFSET);
        // Corrected sample stays off every symbol level
        let corrected: f32 = 0.0 - freq.estimate();
        assert_eq!(corrected.abs(), MAX_OFFSET);
    }
}
