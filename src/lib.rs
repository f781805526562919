//! M17 TNC Receive Chain
//!
//! This library provides the receive side of an STM32G474-based terminal
//! node controller for the M17 digital voice/data protocol. It turns blocks
//! of ADC samples into validated link-layer frames and manages the
//! fixed-capacity pool those frames are built from.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HOST LINK (external)                      │
//! │        KISS / HDLC framing of emitted IoFrames               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      M17 LAYER                               │
//! │  Sync state machine │ Correlators │ Framer │ Decoder         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      DSP LAYER                               │
//! │  RRC filter │ Deviation/Frequency │ Timing PLL │ Slicer      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / FRAME POOL                           │
//! │  ADC front end  │  Segment pool  │  IoFrame allocator        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **No allocator**: decoded output lives in a static segment arena
//! - **Bounded work**: every stage completes within one 192-sample block
//! - **No unsafe in application code**: ownership of frame storage is moved
//!   as `&'static mut` references under a critical section
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

/// Hardware Abstraction Layer
///
/// Audio front-end contract and ADC sample conversion.
pub mod hal;

/// Digital Signal Processing
///
/// Matched filter, signal conditioning, timing recovery, slicing.
pub mod dsp;

/// Frame Pool
///
/// Fixed-capacity segment arena and the `IoFrame` allocator.
pub mod hdlc;

/// M17 Protocol
///
/// Sync correlators, bit framer, frame decoder and the demodulator.
pub mod m17;

/// Demodulator control surface
pub mod demod;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::demod::Demodulator;
    pub use crate::hal::adc::AudioFrontEnd;
    pub use crate::hdlc::{FramePool, IoFrame, PoolError, Segment};
    pub use crate::m17::decoder::{Decoded, FrameDecoder, HardDecisionDecoder};
    pub use crate::m17::demodulator::M17Demodulator;
    pub use crate::types::*;
}
