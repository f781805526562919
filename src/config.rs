//! System configuration and protocol constants
//!
//! Compile-time constants for the receive chain and the frame pool, plus
//! [`DemodConfig`] for the handful of values that may be tuned per
//! deployment.

/// Audio ADC sample rate (48 kHz)
pub const SAMPLE_RATE: u32 = 48_000;

/// M17 symbol rate (4800 baud, 4-FSK)
pub const SYMBOL_RATE: u32 = 4_800;

/// Samples per symbol at the fixed sample/symbol rate pair
pub const SAMPLES_PER_SYMBOL: u32 = SAMPLE_RATE / SYMBOL_RATE;

/// Samples delivered per ADC callback
pub const ADC_BLOCK_SIZE: usize = 192;

/// Soft bits in one M17 frame after the 16-bit sync word
pub const FRAME_BITS: usize = 368;

/// M17 sync word
pub const SYNC_WORD: u16 = 0x3243;

/// Root-raised-cosine matched filter length (must be even)
pub const RRC_TAPS: usize = 80;

/// Root-raised-cosine roll-off factor
pub const RRC_ROLLOFF: f32 = 0.5;

/// Scale from a Q15 code to the demodulator's symbol units
pub const INPUT_SCALE: f32 = 20.0 / 32768.0;

/// Ideal per-sample advance of the symbol clock
pub const IDEAL_DT: f32 = SYMBOL_RATE as f32 / SAMPLE_RATE as f32;

/// Resolution of the soft decisions handed to the framer, in bits
pub const LLR_BITS: u32 = 4;

/// Numerator of the EVM / carrier / frequency smoothing biquad
pub const EVM_B: [f32; 3] = [0.020_083_37, 0.040_166_73, 0.020_083_37];

/// Denominator of the EVM / carrier / frequency smoothing biquad
pub const EVM_A: [f32; 3] = [1.0, -1.561_018_08, 0.641_351_54];

/// Bytes per frame segment
pub const SEGMENT_SIZE: usize = 32;

/// Number of segments in the static arena
pub const SEGMENT_COUNT: usize = 64;

/// Maximum frames outstanding from the global pool
pub const FRAME_COUNT: usize = 8;

/// Maximum segments chained into one frame (822-byte M17 packet + CRC)
pub const MAX_FRAME_SEGMENTS: usize = 27;

/// Symbol periods between periodic telemetry lines
pub const TELEMETRY_INTERVAL: u32 = 192;

/// Runtime tunables of the M17 demodulator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemodConfig {
    /// Timing loop gain while the carrier detector reports lock
    pub locked_loop_gain: f32,
    /// Timing loop gain while acquiring
    pub unlocked_loop_gain: f32,
    /// Allowed fractional excursion of the symbol clock from ideal
    pub timing_tolerance: f32,
    /// Unmatched symbol periods tolerated between frames
    pub sync_loss_limit: u32,
    /// Bit errors accepted by the acquisition correlator
    pub acquire_sync_errors: u32,
    /// Bit errors accepted by the inter-frame correlator
    pub track_sync_errors: u32,
    /// Smoothed EVM below which the carrier is declared
    pub carrier_lock_level: f32,
    /// Smoothed EVM above which the carrier is dropped
    pub carrier_unlock_level: f32,
    /// Emit frames that fail validation
    pub passall: bool,
    /// Symbol periods between telemetry lines
    pub telemetry_interval: u32,
}

impl DemodConfig {
    /// Lowest symbol clock advance permitted by the timing loop
    #[must_use]
    pub fn min_dt(&self) -> f32 {
        IDEAL_DT * (1.0 - self.timing_tolerance)
    }

    /// Highest symbol clock advance permitted by the timing loop
    #[must_use]
    pub fn max_dt(&self) -> f32 {
        IDEAL_DT * (1.0 + self.timing_tolerance)
    }
}

impl Default for DemodConfig {
    fn default() -> Self {
        Self {
            locked_loop_gain: 0.002,
            unlocked_loop_gain: 0.01,
            timing_tolerance: 0.05,
            sync_loss_limit: 8,
            acquire_sync_errors: 1,
            track_sync_errors: 4,
            carrier_lock_level: 0.01,
            carrier_unlock_level: 0.75,
            passall: false,
            telemetry_interval: TELEMETRY_INTERVAL,
        }
    }
}
