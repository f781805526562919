//! Filter Design Module
//!
//! Coefficient calculation for the receive matched filter. Runs once at
//! initialization, never in the per-sample path.
//!
//! The M17 pulse shape is root-raised-cosine with roll-off 0.5. Taps are
//! centred on `(N - 1) / 2`, so an even length puts the peak between two
//! samples, and scaled for unit gain at DC so the Q1.15 filter output stays
//! on the same scale as its input.

use core::f32::consts::{FRAC_1_SQRT_2, PI};

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::filter::FirCoefficients;
use crate::config::{RRC_ROLLOFF, RRC_TAPS, SAMPLES_PER_SYMBOL};

/// Root-raised-cosine impulse response at time `z`, in symbol periods
#[must_use]
pub fn rrc_response(z: f32, beta: f32) -> f32 {
    if z.abs() < 1e-5 {
        return 1.0 - beta + 4.0 * beta / PI;
    }

    let g = 1.0 - 16.0 * beta * beta * z * z;
    if (g * g) < 1e-5 {
        // Limit at z = ±1/(4β)
        let g1 = 1.0 + 2.0 / PI;
        let g2 = (0.25 * PI / beta).sin();
        let g3 = 1.0 - 2.0 / PI;
        let g4 = (0.25 * PI / beta).cos();
        return beta * FRAC_1_SQRT_2 * (g1 * g2 + g3 * g4);
    }

    let t1 = ((1.0 + beta) * PI * z).cos();
    let t2 = ((1.0 - beta) * PI * z).sin();
    let t3 = 1.0 / (4.0 * beta * z);
    let t4 = 4.0 * beta / (PI * g);
    t4 * (t1 + t2 * t3)
}

/// Design an N-tap root-raised-cosine filter with unit DC gain
///
/// # Arguments
/// * `samples_per_symbol` - Oversampling ratio
/// * `beta` - Roll-off factor, in (0, 1]
#[must_use]
pub fn design_rrc<const N: usize>(samples_per_symbol: f32, beta: f32) -> [f32; N] {
    let mut taps = [0.0f32; N];
    let centre = (N as f32 - 1.0) / 2.0;
    let beta = beta.clamp(0.01, 1.0);

    for (n, tap) in taps.iter_mut().enumerate() {
        let z = (n as f32 - centre) / samples_per_symbol;
        *tap = rrc_response(z, beta);
    }

    let sum: f32 = taps.iter().sum();
    if sum.abs() > 0.0001 {
        for tap in &mut taps {
            *tap /= sum;
        }
    }

    taps
}

/// Coefficients of the M17 receive matched filter
#[must_use]
pub fn matched_filter() -> FirCoefficients<RRC_TAPS> {
    FirCoefficients::from_f32(&design_rrc::<RRC_TAPS>(
        SAMPLES_PER_SYMBOL as f32,
        RRC_ROLLOFF,
    ))
}
