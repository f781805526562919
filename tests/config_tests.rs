//! Configuration Tests
//!
//! Sanity checks on the compile-time constants and demodulator defaults.
//! Run with: cargo test --features std --test config_tests

use m17_tnc::config::*;
use m17_tnc::m17::decoder::HARD_FRAME_BYTES;

// =============================================================================
// Rate Tests
// =============================================================================

#[test]
fn test_samples_per_symbol() {
    assert_eq!(SAMPLES_PER_SYMBOL, 10);
    assert_eq!(SAMPLE_RATE % SYMBOL_RATE, 0);
}

#[test]
fn test_ideal_dt_is_symbol_period_fraction() {
    assert!((IDEAL_DT - 0.1).abs() < 1e-6);
}

#[test]
fn test_block_completes_at_most_one_frame() {
    // process() returns a single frame per block
    let frame_samples = FRAME_BITS / 2 * SAMPLES_PER_SYMBOL as usize;
    assert!(frame_samples > ADC_BLOCK_SIZE);
}

#[test]
fn test_input_scale_maps_outer_level() {
    // +3 deviation sits at about 15% of full scale
    let three = 4915.0 * INPUT_SCALE;
    assert!((three - 3.0).abs() < 0.01, "scaled {}", three);
}

// =============================================================================
// Frame Tests
// =============================================================================

#[test]
fn test_frame_is_whole_symbols_and_bytes() {
    assert_eq!(FRAME_BITS % 2, 0);
    assert_eq!(HARD_FRAME_BYTES * 8, FRAME_BITS);
}

#[test]
fn test_frame_fits_in_segments() {
    // Largest frame a decoder produces is a full soft-bit dump
    assert!(MAX_FRAME_SEGMENTS * SEGMENT_SIZE >= 822);
    assert!(MAX_FRAME_SEGMENTS <= SEGMENT_COUNT);
}

#[test]
fn test_pool_has_segments_for_every_frame() {
    assert!(SEGMENT_COUNT >= FRAME_COUNT);
}

#[test]
fn test_evm_filter_has_unit_dc_gain() {
    let b: f32 = EVM_B.iter().sum();
    let a: f32 = EVM_A.iter().sum();
    assert!((b / a - 1.0).abs() < 1e-3);
}

// =============================================================================
// DemodConfig Tests
// =============================================================================

#[test]
fn test_demod_config_defaults() {
    let config = DemodConfig::default();
    assert_eq!(config.sync_loss_limit, 8);
    assert_eq!(config.acquire_sync_errors, 1);
    assert_eq!(config.track_sync_errors, 4);
    assert_eq!(config.carrier_lock_level, 0.01);
    assert_eq!(config.carrier_unlock_level, 0.75);
    assert!(!config.passall);
    assert_eq!(config.telemetry_interval, TELEMETRY_INTERVAL);
    assert!(config.locked_loop_gain < config.unlocked_loop_gain);
}

#[test]
fn test_demod_config_dt_band() {
    let config = DemodConfig::default();
    assert!((config.min_dt() - 0.095).abs() < 1e-6);
    assert!((config.max_dt() - 0.105).abs() < 1e-6);
    assert!(config.min_dt() < IDEAL_DT && IDEAL_DT < config.max_dt());
}

#[test]
fn test_carrier_hysteresis_is_ordered() {
    let config = DemodConfig::default();
    assert!(config.carrier_lock_level < config.carrier_unlock_level);
}
