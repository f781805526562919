//! Digital Filters
//!
//! Fixed-point FIR for the matched filter and a floating-point biquad for the
//! smoothing loops (EVM, carrier detect, frequency offset).

use fixed::types::I1F15;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

/// Fixed-point sample type (Q1.15 format)
pub type Sample = I1F15;

/// Convert f32 to fixed-point sample
#[must_use]
pub fn to_sample(value: f32) -> Sample {
    Sample::from_num(value.clamp(-1.0, 0.99997))
}

/// Convert fixed-point sample to f32
#[must_use]
pub fn from_sample(sample: Sample) -> f32 {
    sample.to_num::<f32>()
}

/// FIR filter coefficients
#[derive(Clone)]
pub struct FirCoefficients<const N: usize> {
    taps: [Sample; N],
}

impl<const N: usize> FirCoefficients<N> {
    /// Create coefficients from f32 array
    #[must_use]
    pub fn from_f32(coeffs: &[f32; N]) -> Self {
        let mut taps = [Sample::ZERO; N];
        for (tap, &c) in taps.iter_mut().zip(coeffs) {
            *tap = to_sample(c);
        }
        Self { taps }
    }

    /// Get coefficient at index
    #[must_use]
    pub fn get(&self, index: usize) -> Sample {
        self.taps.get(index).copied().unwrap_or(Sample::ZERO)
    }
}

/// FIR filter state
pub struct FirFilter<const N: usize> {
    coeffs: FirCoefficients<N>,
    /// Delay line (circular buffer)
    delay: [Sample; N],
    pos: usize,
}

impl<const N: usize> FirFilter<N> {
    /// Create a new FIR filter with given coefficients
    #[must_use]
    pub fn new(coeffs: FirCoefficients<N>) -> Self {
        Self {
            coeffs,
            delay: [Sample::ZERO; N],
            pos: 0,
        }
    }

    /// Process a single sample
    pub fn process(&mut self, input: Sample) -> Sample {
        self.delay[self.pos] = input;

        let mut acc = Sample::ZERO;
        let mut idx = self.pos;

        for i in 0..N {
            // Saturate rather than wrap on overload
            let product = self.delay[idx].saturating_mul(self.coeffs.get(i));
            acc = acc.saturating_add(product);

            if idx == 0 {
                idx = N - 1;
            } else {
                idx -= 1;
            }
        }

        self.pos = (self.pos + 1) % N;

        acc
    }

    /// Filter raw Q15 codes
    pub fn process_q15(&mut self, input: i16) -> i16 {
        self.process(Sample::from_bits(input)).to_bits()
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.delay.fill(Sample::ZERO);
        self.pos = 0;
    }
}

/// Biquad (second-order IIR) filter coefficients
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    /// Numerator coefficients (b0, b1, b2)
    b: [f32; 3],
    /// Denominator coefficients (a1, a2) - a0 is always 1
    a: [f32; 2],
}

impl BiquadCoeffs {
    /// Create from numerator and denominator arrays, normalizing by `a[0]`
    #[must_use]
    pub fn from_ba(b: [f32; 3], a: [f32; 3]) -> Self {
        let a0 = if a[0] == 0.0 { 1.0 } else { a[0] };
        Self {
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
            a: [a[1] / a0, a[2] / a0],
        }
    }

    /// Gain at DC
    #[must_use]
    pub fn dc_gain(&self) -> f32 {
        let den = 1.0 + self.a[0] + self.a[1];
        if den.abs() < f32::EPSILON {
            return 1.0;
        }
        (self.b[0] + self.b[1] + self.b[2]) / den
    }
}

/// Biquad filter state
#[derive(Clone, Copy, Debug, Default)]
pub struct BiquadFilter {
    coeffs: Option<BiquadCoeffs>,
    /// State variables (Direct Form II Transposed)
    z: [f32; 2],
}

impl BiquadFilter {
    /// Create with coefficients
    #[must_use]
    pub fn with_coeffs(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs: Some(coeffs),
            z: [0.0; 2],
        }
    }

    /// Process a single sample
    pub fn process(&mut self, input: f32) -> f32 {
        let Some(c) = &self.coeffs else {
            return input;
        };

        let output = c.b[0] * input + self.z[0];
        self.z[0] = c.b[1] * input - c.a[0] * output + self.z[1];
        self.z[1] = c.b[2] * input - c.a[1] * output;

        output
    }

    /// Load the steady state reached after a constant input
    ///
    /// The next `process(input)` returns `input * dc_gain()`.
    pub fn settle(&mut self, input: f32) {
        let Some(c) = &self.coeffs else {
            return;
        };

        let output = input * c.dc_gain();
        self.z[1] = c.b[2] * input - c.a[1] * output;
        self.z[0] = output - c.b[0] * input;
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }
}
