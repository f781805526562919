//! Symbol timing recovery
//!
//! The symbol clock is a phase accumulator advanced by `dt` per input sample.
//! [`PhaseEstimator`] turns the three samples around a symbol into a timing
//! error and [`TimingLoop`] closes the loop by trimming `dt`.

use crate::config::{DemodConfig, IDEAL_DT, SAMPLE_RATE, SYMBOL_RATE};

/// Bound on the phase estimate, in window samples
const PHASE_LIMIT: f32 = 5.0;

/// Early/late timing error detector
#[derive(Clone, Copy, Debug)]
pub struct PhaseEstimator {
    dx: f32,
}

impl PhaseEstimator {
    /// Create an estimator for a sample/symbol rate pair
    #[must_use]
    pub fn new(sample_rate: f32, symbol_rate: f32) -> Self {
        Self {
            dx: 2.0 * symbol_rate / sample_rate,
        }
    }

    /// Estimate timing error from `[prev, centre, next]`
    ///
    /// Positive when the later sample is larger, i.e. the clock is early on
    /// a rising symbol.
    #[must_use]
    pub fn estimate(&self, window: &[f32; 3]) -> f32 {
        let slope = (window[2] - window[0]) / 3.0;
        (slope / self.dx).clamp(-PHASE_LIMIT, PHASE_LIMIT)
    }
}

impl Default for PhaseEstimator {
    fn default() -> Self {
        Self::new(SAMPLE_RATE as f32, SYMBOL_RATE as f32)
    }
}

/// Loop filter for the symbol clock
#[derive(Clone, Copy, Debug)]
pub struct TimingLoop {
    dt: f32,
    gain: f32,
    locked_gain: f32,
    unlocked_gain: f32,
    min_dt: f32,
    max_dt: f32,
}

impl TimingLoop {
    /// Create a loop with the gains and bounds from `config`
    #[must_use]
    pub fn new(config: &DemodConfig) -> Self {
        Self {
            dt: IDEAL_DT,
            gain: config.unlocked_loop_gain,
            locked_gain: config.locked_loop_gain,
            unlocked_gain: config.unlocked_loop_gain,
            min_dt: config.min_dt(),
            max_dt: config.max_dt(),
        }
    }

    /// Select the loop gain for the current carrier state
    pub fn set_locked(&mut self, locked: bool) {
        self.gain = if locked {
            self.locked_gain
        } else {
            self.unlocked_gain
        };
    }

    /// Apply one phase error, returns the new clock advance
    pub fn update(&mut self, phase: f32) -> f32 {
        let dt = IDEAL_DT - phase * self.gain;
        self.dt = if dt.is_nan() {
            IDEAL_DT
        } else {
            dt.clamp(self.min_dt, self.max_dt)
        };
        self.dt
    }

    /// Current clock advance per input sample
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// Current loop gain
    #[must_use]
    pub const fn gain(&self) -> f32 {
        self.gain
    }

    /// Return to the nominal rate
    pub fn reset(&mut self) {
        self.dt = IDEAL_DT;
        self.gain = self.unlocked_gain;
    }
}

impl Default for TimingLoop {
    fn default() -> Self {
        Self::new(&DemodConfig::default())
    }
}
