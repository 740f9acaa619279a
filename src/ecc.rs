//! Error correction codes for the storage pipeline.
//!
//! Currently implemented:
//! - Hamming (7,4): two codewords per 8-bit unit, single-bit correction per
//!   codeword
//!
//! Codes work on text: the input is a character sequence whose code points
//! fit in 8 bits, and the protected stream is a bit-string of `'0'`/`'1'`
//! characters.
//!
//! # Examples
//!
//! ```rust
//! use dna_storage_sim::ecc::{ErrorCorrection, HammingCode};
//!
//! let code = HammingCode::new();
//! let mut bits: Vec<char> = code.encode("DNA").unwrap().chars().collect();
//! bits[3] = if bits[3] == '0' { '1' } else { '0' };
//! let bits: String = bits.into_iter().collect();
//!
//! let recovered = code.decode(&bits).unwrap();
//! assert_eq!(recovered.text, "DNA");
//! assert_eq!(recovered.errors_corrected, 1);
//! ```

use crate::error::Result;

/// Output of a decode: the recovered text and how many codewords needed a
/// bit flipped to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corrected {
    pub text: String,
    pub errors_corrected: usize,
}

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode text into a protected bit-string
    fn encode(&self, data: &str) -> Result<String>;

    /// Decode a protected bit-string, correcting errors where the code can
    fn decode(&self, encoded: &str) -> Result<Corrected>;
}

pub mod hamming;
pub use hamming::{hamming_decode, hamming_encode, HammingCode, Syndrome};
