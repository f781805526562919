//! Digital Signal Processing
//!
//! Building blocks of the M17 receive chain:
//! - Q1.15 FIR matched filter and its root-raised-cosine design
//! - Biquad smoothing shared by the EVM, carrier and frequency loops
//! - Symbol timing recovery (phase estimator and clock loop)
//! - Deviation and frequency-offset correction
//! - Hard/soft symbol decisions and carrier detection

pub mod carrier;
pub mod correction;
pub mod filter;
pub mod filter_design;
pub mod slicer;
pub mod timing;

pub use carrier::CarrierDetect;
pub use correction::{DeviationError, FrequencyError};
pub use slicer::{llr, SymbolEvm};
pub use timing::{PhaseEstimator, TimingLoop};
