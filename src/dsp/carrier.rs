//! Data carrier detect
//!
//! Smooths the per-symbol EVM and applies lock/unlock hysteresis. The filter
//! starts settled at an EVM of 1.0, so the detector reports no carrier until
//! a run of clean symbols pulls the average below the lock level.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::filter::{BiquadCoeffs, BiquadFilter};
use crate::config::{DemodConfig, EVM_A, EVM_B};

const IDLE_EVM: f32 = 1.0;

/// EVM-based carrier detector
#[derive(Clone, Copy, Debug)]
pub struct CarrierDetect {
    filter: BiquadFilter,
    lock_level: f32,
    unlock_level: f32,
    locked: bool,
    level: f32,
}

impl CarrierDetect {
    /// Create a detector with explicit thresholds
    #[must_use]
    pub fn new(lock_level: f32, unlock_level: f32) -> Self {
        let mut filter = BiquadFilter::with_coeffs(BiquadCoeffs::from_ba(EVM_B, EVM_A));
        filter.settle(IDLE_EVM);
        Self {
            filter,
            lock_level,
            unlock_level,
            locked: false,
            level: IDLE_EVM,
        }
    }

    /// Create a detector with the thresholds from `config`
    #[must_use]
    pub fn from_config(config: &DemodConfig) -> Self {
        Self::new(config.carrier_lock_level, config.carrier_unlock_level)
    }

    /// Feed one instantaneous EVM, returns `(locked, smoothed_evm)`
    pub fn update(&mut self, evm: f32) -> (bool, f32) {
        self.level = self.filter.process(evm.abs());
        if self.locked && self.level > self.unlock_level {
            self.locked = false;
        } else if !self.locked && self.level < self.lock_level {
            self.locked = true;
        }
        (self.locked, self.level)
    }

    /// Current lock decision
    #[must_use]
    pub const fn locked(&self) -> bool {
        self.locked
    }

    /// Current smoothed EVM
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Return to the idle, unlocked state
    pub fn reset(&mut self) {
        self.filter.settle(IDLE_EVM);
        self.locked = false;
        self.level = IDLE_EVM;
    }
}

impl Default for CarrierDetect {
    fn default() -> Self {
        Self::from_config(&DemodConfig::default())
    }
}
