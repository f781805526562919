//! Shared types used across the TNC firmware
//!
//! Domain types for the receive chain. Constructors enforce the invariants
//! (symbol values, state tags) so downstream code never has to re-check them.

use core::fmt;

/// One 4-FSK symbol
///
/// M17 maps each dibit to a deviation level: `+1 → 00`, `+3 → 01`,
/// `-1 → 10`, `-3 → 11`. The dibit value is what the sync correlators see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Deviation levels in dibit order
    pub const LEVELS: [f32; 4] = [1.0, 3.0, -1.0, -3.0];

    /// Create a symbol from a dibit, returns None if out of range
    #[must_use]
    pub const fn from_dibit(dibit: u8) -> Option<Self> {
        if dibit < 4 {
            Some(Self(dibit))
        } else {
            None
        }
    }

    /// Nearest symbol to a normalized sample
    #[must_use]
    pub fn from_level(sample: f32) -> Self {
        if sample >= 2.0 {
            Self(1)
        } else if sample >= 0.0 {
            Self(0)
        } else if sample >= -2.0 {
            Self(2)
        } else {
            Self(3)
        }
    }

    /// Get the two-bit value
    #[must_use]
    pub const fn dibit(self) -> u8 {
        self.0
    }

    /// Get the ideal deviation level
    #[must_use]
    pub fn level(self) -> f32 {
        Self::LEVELS[usize::from(self.0)]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.level() as i8)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Symbol {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Sym({})", self.0);
    }
}

/// Two soft decisions for one symbol, most significant bit first
///
/// Each value lies in `[-LLR_LIMIT, LLR_LIMIT]`; positive means a 1 bit.
pub type SoftDibit = [i8; 2];

/// Synchronization state of the M17 demodulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DemodState {
    /// No carrier
    #[default]
    Unlocked = 0,
    /// Carrier present, searching for the first sync word
    Sync = 1,
    /// Between frames, waiting for the next sync word
    FrSync = 2,
    /// Collecting soft bits for a frame
    Framing = 3,
}

impl DemodState {
    /// Numeric tag used in telemetry
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DemodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => write!(f, "UNLOCKED"),
            Self::Sync => write!(f, "SYNC"),
            Self::FrSync => write!(f, "FR_SYNC"),
            Self::Framing => write!(f, "FRAMING"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DemodState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unlocked => defmt::write!(f, "UNLOCKED"),
            Self::Sync => defmt::write!(f, "SYNC"),
            Self::FrSync => defmt::write!(f, "FR_SYNC"),
            Self::Framing => defmt::write!(f, "FRAMING"),
        }
    }
}

/// One symbol period's output of the signal chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSample {
    /// Corrected centre sample
    pub sample: f32,
    /// Sign-corrected phase error
    pub phase: f32,
    /// Sliced symbol
    pub symbol: Symbol,
    /// Instantaneous error vector magnitude
    pub evm: f32,
}

impl SymbolSample {
    /// Build a sample sitting exactly on a symbol's level
    #[must_use]
    pub fn ideal(symbol: Symbol, evm: f32) -> Self {
        Self {
            sample: symbol.level(),
            phase: 0.0,
            symbol,
            evm,
        }
    }
}
