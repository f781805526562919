//! Sync word correlator
//!
//! Dibits are shifted into a 16-bit register, newest in the low bits, and
//! compared with the expected word by Hamming distance after every symbol.

use crate::config::SYNC_WORD;
use crate::types::Symbol;

/// Sliding-window sync word detector
#[derive(Clone, Copy, Debug)]
pub struct SyncCorrelator {
    expected: u16,
    max_errors: u32,
    buffer: u16,
}

impl SyncCorrelator {
    /// Create a correlator accepting up to `max_errors` bit errors
    #[must_use]
    pub const fn new(expected: u16, max_errors: u32) -> Self {
        Self {
            expected,
            max_errors,
            buffer: 0,
        }
    }

    /// Correlator for the M17 sync word
    #[must_use]
    pub const fn m17(max_errors: u32) -> Self {
        Self::new(SYNC_WORD, max_errors)
    }

    /// Shift in one symbol, returns true if the window matches
    pub fn matches(&mut self, symbol: Symbol) -> bool {
        self.buffer = (self.buffer << 2) | u16::from(symbol.dibit());
        self.distance() <= self.max_errors
    }

    /// Bit errors between the window and the expected word
    #[must_use]
    pub const fn distance(&self) -> u32 {
        (self.buffer ^ self.expected).count_ones()
    }

    /// Bit errors tolerated
    #[must_use]
    pub const fn max_errors(&self) -> u32 {
        self.max_errors
    }

    /// Clear the window
    pub fn reset(&mut self) {
        self.buffer = 0;
    }
}

/// Sync word as a symbol sequence, first transmitted first
#[must_use]
pub fn sync_symbols(word: u16) -> [Symbol; 8] {
    let mut symbols = [Symbol::from_level(1.0); 8];
    for (i, symbol) in symbols.iter_mut().enumerate() {
        let dibit = ((word >> (14 - 2 * i)) & 0b11) as u8;
        if let Some(s) = Symbol::from_dibit(dibit) {
            *symbol = s;
        }
    }
    symbols
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn m17_sync_word_dibits() {
        let dibits: Vec<u8> = sync_symbols(SYNC_WORD).iter().map(|s| s.dibit()).collect();
        assert_eq!(dibits, [0, 3, 0, 2, 1, 0, 0, 3]);
    }

    #[test]
    fn matches_on_last_symbol_of_word() {
        let mut sync = SyncCorrelator::m17(0);
        let word = sync_symbols(SYNC_WORD);
        for s in &word[..7] {
            assert!(!sync.matches(*s));
        }
        assert!(sync.matches(word[7]));
        assert_eq!(sync.distance(), 0);
    }
}
