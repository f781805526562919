//! ADC Front End
//!
//! The demodulator only needs three things from the analog side: start
//! sampling at a rate, stop sampling, and silence the loopback output. That
//! contract is [`AudioFrontEnd`]. Raw 12-bit conversions are turned into the
//! signed Q15 codes the matched filter expects by [`AdcReading`].

#[cfg(feature = "embedded")]
use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
#[cfg(feature = "embedded")]
use embassy_stm32::peripherals::ADC1;

use crate::config::ADC_BLOCK_SIZE;

/// Mid-scale code of the 12-bit converter
const ADC_MIDSCALE: i32 = 2048;

/// Analog front end controlled by a demodulator
pub trait AudioFrontEnd {
    /// Begin delivering sample blocks at `sample_rate`
    fn start_adc(&mut self, sample_rate: u32);

    /// Stop sample acquisition
    fn stop_adc(&mut self);

    /// Stop the audio loopback output, if running
    fn stop_loopback(&mut self);
}

/// ADC reading result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to a signed Q15 code centred on mid-scale
    #[must_use]
    pub fn as_i16(self) -> i16 {
        let centred = (i32::from(self.raw) - ADC_MIDSCALE) * 16;
        centred.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// One demodulator block of converted samples
pub struct SampleBlock {
    samples: [i16; ADC_BLOCK_SIZE],
    len: usize,
}

impl SampleBlock {
    /// Create a new empty block
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: [0; ADC_BLOCK_SIZE],
            len: 0,
        }
    }

    /// Append a reading, returns false if the block is already full
    pub fn push(&mut self, reading: AdcReading) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples[self.len] = reading.as_i16();
        self.len += 1;
        true
    }

    /// Get the samples as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        &self.samples[..self.len]
    }

    /// Check if block is full
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len >= ADC_BLOCK_SIZE
    }

    /// Discard contents
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for SampleBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio ADC driver for the receive path
#[cfg(feature = "embedded")]
pub struct AudioAdc<'d> {
    adc: Adc<'d, ADC1>,
}

#[cfg(feature = "embedded")]
impl AudioAdc<'_> {
    /// Create a new audio ADC driver
    #[must_use]
    pub fn new(adc: ADC1) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc }
    }

    /// Read a single audio sample
    pub fn read<T: AdcChannel<ADC1>>(&mut self, channel: &mut T) -> AdcReading {
        let raw = self.adc.blocking_read(channel);
        AdcReading::from_raw(raw)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn midscale_is_zero() {
        assert_eq!(AdcReading::from_raw(2048).as_i16(), 0);
    }

    #[test]
    fn full_scale_maps_to_q15_range() {
        assert_eq!(AdcReading::from_raw(0).as_i16(), i16::MIN);
        assert_eq!(AdcReading::from_raw(4095).as_i16(), 32752);
    }

    #[test]
    fn block_fills_to_size() {
        let mut block = SampleBlock::new();
        for _ in 0..ADC_BLOCK_SIZE {
            assert!(block.push(AdcReading::from_raw(2049)));
        }
        assert!(block.is_full());
        assert!(!block.push(AdcReading::from_raw(0)));
        assert!(block.as_slice().iter().all(|&s| s == 16));
        block.clear();
        assert!(block.as_slice().is_empty());
    }
}
