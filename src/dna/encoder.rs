//! Mapping between 8-bit units and DNA bases.
//!
//! Each unit becomes four bases, one per 2-bit group, most significant pair
//! first. `"A"` (0x41 = 01 00 00 01) encodes to `CAAC`.
//!
//! # Digit characters, not bits
//!
//! When fed the bit-string produced by the compressor, the units are the
//! *characters* `'0'` (48) and `'1'` (49), so every compressed bit costs four
//! bases instead of the half-base a packed 2-bits-per-base mapping would
//! need. The expansion is kept as is; [`BaseEncoder::packed_len`] reports the
//! packed length for comparison.

use super::Nucleotide;
use crate::error::{Error, Result};
use crate::units::{from_unit, units};

/// Bases emitted per 8-bit unit.
pub const BASES_PER_UNIT: usize = 4;

/// Converts character sequences to and from base sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseEncoder;

impl BaseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode every character of `sequence` as four bases.
    ///
    /// # Errors
    ///
    /// `RangeError::CodePoint` if a character lies outside 0..=255.
    pub fn encode(&self, sequence: &str) -> Result<String> {
        let mut bases = String::with_capacity(sequence.len() * BASES_PER_UNIT);
        for unit in units(sequence) {
            let unit = unit?;
            for shift in [6, 4, 2, 0] {
                bases.push(Nucleotide::from_bits(unit >> shift).to_char());
            }
        }
        Ok(bases)
    }

    /// Decode a base sequence back into characters.
    ///
    /// # Errors
    ///
    /// `Error::MalformedInput` if the length is not a multiple of four or a
    /// symbol is not one of A, C, G, T.
    pub fn decode(&self, bases: &str) -> Result<String> {
        let symbols: Vec<char> = bases.chars().collect();
        if symbols.len() % BASES_PER_UNIT != 0 {
            return Err(Error::malformed(format!(
                "base sequence length {} is not a multiple of {}",
                symbols.len(),
                BASES_PER_UNIT
            )));
        }

        let mut decoded = String::with_capacity(symbols.len() / BASES_PER_UNIT);
        for (group, chunk) in symbols.chunks_exact(BASES_PER_UNIT).enumerate() {
            let mut unit = 0u8;
            for (offset, &symbol) in chunk.iter().enumerate() {
                let base = Nucleotide::from_char(symbol).ok_or_else(|| {
                    Error::malformed(format!(
                        "invalid base {:?} at position {}",
                        symbol,
                        group * BASES_PER_UNIT + offset
                    ))
                })?;
                unit = (unit << 2) | base.to_index();
            }
            decoded.push(from_unit(unit));
        }
        Ok(decoded)
    }

    /// Number of bases a packed mapping (2 bits per base) would need for
    /// `bit_count` payload bits.
    pub fn packed_len(bit_count: usize) -> usize {
        bit_count.div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RangeError;

    #[test]
    fn test_encode_known_values() {
        let encoder = BaseEncoder::new();
        assert_eq!(encoder.encode("A").unwrap(), "CAAC");
        assert_eq!(encoder.encode("\u{0}").unwrap(), "AAAA");
        assert_eq!(encoder.encode("\u{ff}").unwrap(), "TTTT");
        // Compressor digits: '0' = 0x30, '1' = 0x31
        assert_eq!(encoder.encode("01").unwrap(), "ATAAATAC");
    }

    #[test]
    fn test_roundtrip_all_units() {
        let encoder = BaseEncoder::new();
        let text: String = (0u8..=255).map(char::from).collect();
        let bases = encoder.encode(&text).unwrap();
        assert_eq!(bases.len(), 256 * BASES_PER_UNIT);
        assert_eq!(encoder.decode(&bases).unwrap(), text);
    }

    #[test]
    fn test_roundtrip_text() {
        let encoder = BaseEncoder::new();
        for text in ["HELLO", "", "0110100111", "caf\u{e9}"] {
            let bases = encoder.encode(text).unwrap();
            assert_eq!(encoder.decode(&bases).unwrap(), text);
        }
    }

    #[test]
    fn test_encode_out_of_range() {
        let encoder = BaseEncoder::new();
        match encoder.encode("DN\u{394}") {
            Err(Error::Range(RangeError::CodePoint { value, position })) => {
                assert_eq!(value, 0x394);
                assert_eq!(position, 2);
            }
            other => panic!("expected CodePoint error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_misaligned() {
        let encoder = BaseEncoder::new();
        assert!(matches!(
            encoder.decode("ACG"),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            encoder.decode("ACGTA"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_invalid_base() {
        let encoder = BaseEncoder::new();
        assert!(matches!(
            encoder.decode("ACGN"),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            encoder.decode("acgt"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(BaseEncoder::packed_len(0), 0);
        assert_eq!(BaseEncoder::packed_len(7), 4);
        assert_eq!(BaseEncoder::packed_len(8), 4);
        // Digit-character mapping is 8x the packed length.
        let encoder = BaseEncoder::new();
        let bits = "01101001";
        assert_eq!(
            encoder.encode(bits).unwrap().len(),
            8 * BaseEncoder::packed_len(bits.len())
        );
    }
}
