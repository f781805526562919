//! Hardware Abstraction Layer
//!
//! Isolates the demodulator from the STM32G474 peripherals. Everything the
//! receive chain needs from hardware goes through [`adc::AudioFrontEnd`].

pub mod adc;
