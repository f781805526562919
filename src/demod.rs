//! Demodulator control surface
//!
//! The interface the TNC's audio input task drives, independent of the
//! modulation in use.

use crate::hdlc::IoFrame;

/// Block-oriented receive demodulator
pub trait Demodulator {
    /// Reset receive state and start the front end
    fn start(&mut self);

    /// Stop the loopback output and the front end, drop lock
    fn stop(&mut self);

    /// Whether a signal is currently being framed
    fn locked(&self) -> bool;

    /// Samples expected per call to [`Demodulator::process`]
    fn size(&self) -> usize;

    /// Emit frames even when they fail validation
    fn passall(&mut self, enabled: bool);

    /// Consume one block of Q15 samples
    ///
    /// Returns at most one decoded frame; the caller owns it and must
    /// release it.
    fn process(&mut self, input: &[i16]) -> Option<IoFrame>;

    /// Mark/space level difference in dB
    fn twist(&self) -> f32 {
        0.0
    }
}
