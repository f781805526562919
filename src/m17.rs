//! M17 Protocol
//!
//! Sync word correlation, soft-bit framing, frame decoding and the
//! demodulator that ties the receive chain together.

pub mod decoder;
pub mod demodulator;
pub mod framer;
pub mod sync;

pub use decoder::{Decoded, FrameDecoder, HardDecisionDecoder};
pub use demodulator::{M17Demodulator, Telemetry};
pub use framer::Framer;
pub use sync::SyncCorrelator;
