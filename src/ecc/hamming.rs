//! Hamming (7,4) error correction code.
//!
//! Each 8-bit unit is split into its high and low nibble and each nibble
//! `d1 d2 d3 d4` becomes a 7-bit codeword laid out as
//!
//! ```text
//! position:  1   2   3   4   5   6   7
//! bit:       p1  p2  d1  p3  d2  d3  d4
//! ```
//!
//! with `p1 = d1^d2^d4`, `p2 = d1^d3^d4` and `p3 = d2^d3^d4`. Parity bit
//! `p(2^k)` covers every position whose index has bit `k` set, so the three
//! checks read as a binary number give the 1-indexed position of a single
//! flipped bit.
//!
//! # Limitations
//!
//! A codeword with two flipped bits produces a non-zero syndrome that points
//! at a third, correct bit. The decoder flips it and reports a correction;
//! the damage goes unnoticed.

use crate::ecc::{Corrected, ErrorCorrection};
use crate::error::{Error, Result};
use crate::units::{from_unit, units};
use bitvec::prelude::*;
use log::trace;

/// Data bit positions (0-indexed) inside a codeword, in `d1..d4` order.
const DATA_POSITIONS: [usize; 4] = [2, 4, 5, 6];

/// Parity-check result for one codeword.
///
/// Zero means the checks pass; 1-7 is the 1-indexed position of the bit to
/// flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syndrome(u8);

impl Syndrome {
    /// Compute the syndrome of a 7-bit codeword.
    pub fn of(codeword: &BitSlice<u8, Msb0>) -> Self {
        let (p1, p2, d1, p3, d2, d3, d4) = (
            codeword[0],
            codeword[1],
            codeword[2],
            codeword[3],
            codeword[4],
            codeword[5],
            codeword[6],
        );
        let s1 = p1 ^ d1 ^ d2 ^ d4;
        let s2 = p2 ^ d1 ^ d3 ^ d4;
        let s3 = p3 ^ d2 ^ d3 ^ d4;
        Syndrome(u8::from(s1) | (u8::from(s2) << 1) | (u8::from(s3) << 2))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_clean(self) -> bool {
        self.0 == 0
    }

    /// 1-indexed position of the bit to flip, if any.
    pub fn error_position(self) -> Option<usize> {
        (self.0 != 0).then_some(self.0 as usize)
    }
}

/// The (7,4) Hamming code applied to 8-bit units.
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingCode;

impl HammingCode {
    /// Data bits per codeword
    pub const DATA_BITS: usize = 4;
    /// Parity bits per codeword
    pub const PARITY_BITS: usize = 3;
    /// Total codeword length
    pub const CODEWORD_BITS: usize = Self::DATA_BITS + Self::PARITY_BITS;
    /// Encoded bits per 8-bit unit (two codewords)
    pub const UNIT_BITS: usize = 2 * Self::CODEWORD_BITS;

    pub fn new() -> Self {
        Self
    }

    /// Encoded length in bits for `units` input characters.
    pub fn encoded_len(units: usize) -> usize {
        units * Self::UNIT_BITS
    }

    /// Encodes every character of `data` as two codewords.
    ///
    /// # Errors
    ///
    /// `RangeError::CodePoint` if a character lies outside 0..=255.
    pub fn encode(&self, data: &str) -> Result<String> {
        let mut encoded: BitVec<u8, Msb0> = BitVec::with_capacity(data.len() * Self::UNIT_BITS);
        for unit in units(data) {
            let unit = unit?;
            for nibble in [unit >> 4, unit & 0x0F] {
                Self::encode_nibble(nibble, &mut encoded);
            }
        }
        Ok(encoded.iter().map(|bit| if *bit { '1' } else { '0' }).collect())
    }

    /// Appends the codeword for the low four bits of `nibble`.
    fn encode_nibble(nibble: u8, out: &mut BitVec<u8, Msb0>) {
        let d1 = nibble & 0b1000 != 0;
        let d2 = nibble & 0b0100 != 0;
        let d3 = nibble & 0b0010 != 0;
        let d4 = nibble & 0b0001 != 0;

        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p3 = d2 ^ d3 ^ d4;

        for bit in [p1, p2, d1, p3, d2, d3, d4] {
            out.push(bit);
        }
    }

    /// Decodes a bit-string, correcting up to one flipped bit per codeword.
    ///
    /// # Errors
    ///
    /// `Error::MalformedInput` if `encoded` contains anything other than '0'
    /// and '1' or its length is not a multiple of 14.
    pub fn decode(&self, encoded: &str) -> Result<Corrected> {
        let bits = parse_bits(encoded)?;
        if bits.len() % Self::UNIT_BITS != 0 {
            return Err(Error::malformed(format!(
                "encoded length {} is not a multiple of {}",
                bits.len(),
                Self::UNIT_BITS
            )));
        }

        let mut text = String::with_capacity(bits.len() / Self::UNIT_BITS);
        let mut errors_corrected = 0;

        for (index, unit_bits) in bits.chunks_exact(Self::UNIT_BITS).enumerate() {
            let mut unit = 0u8;
            for (half, codeword) in unit_bits.chunks_exact(Self::CODEWORD_BITS).enumerate() {
                let (nibble, syndrome) = Self::decode_codeword(codeword);
                if let Some(position) = syndrome.error_position() {
                    trace!(
                        "codeword {}: flipped bit {}",
                        index * 2 + half,
                        position
                    );
                    errors_corrected += 1;
                }
                unit = (unit << 4) | nibble;
            }
            text.push(from_unit(unit));
        }

        Ok(Corrected {
            text,
            errors_corrected,
        })
    }

    /// Decodes a single 7-bit codeword into its data nibble, correcting the
    /// bit the syndrome points at.
    fn decode_codeword(codeword: &BitSlice<u8, Msb0>) -> (u8, Syndrome) {
        let syndrome = Syndrome::of(codeword);
        let mut corrected = codeword.to_bitvec();
        if let Some(position) = syndrome.error_position() {
            let error_pos = position - 1; // Convert to 0-indexed
            let bit = corrected[error_pos];
            corrected.set(error_pos, !bit);
        }

        let nibble = DATA_POSITIONS
            .iter()
            .fold(0u8, |acc, &i| (acc << 1) | u8::from(corrected[i]));
        (nibble, syndrome)
    }
}

impl ErrorCorrection for HammingCode {
    fn encode(&self, data: &str) -> Result<String> {
        HammingCode::encode(self, data)
    }

    fn decode(&self, encoded: &str) -> Result<Corrected> {
        HammingCode::decode(self, encoded)
    }
}

/// Parses a '0'/'1' string into bits.
fn parse_bits(encoded: &str) -> Result<BitVec<u8, Msb0>> {
    encoded
        .chars()
        .enumerate()
        .map(|(position, digit)| match digit {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Error::malformed(format!(
                "non-binary digit {other:?} at position {position}"
            ))),
        })
        .collect()
}

/// Encodes text using the (7,4) Hamming code
pub fn hamming_encode(data: &str) -> Result<String> {
    HammingCode::new().encode(data)
}

/// Decodes a bit-string using the (7,4) Hamming code
pub fn hamming_decode(encoded: &str) -> Result<Corrected> {
    HammingCode::new().decode(encoded)
}
