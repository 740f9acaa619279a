//! Conversions between characters and the 8-bit units the base encoder and
//! the block code operate on.

use crate::error::{RangeError, Result};

/// Code point of `ch` as one 8-bit unit.
pub(crate) fn to_unit(ch: char, position: usize) -> Result<u8> {
    u8::try_from(u32::from(ch)).map_err(|_| {
        RangeError::CodePoint {
            value: u32::from(ch),
            position,
        }
        .into()
    })
}

/// Iterate over the 8-bit units of `text`, failing on the first character
/// outside 0..=255.
pub(crate) fn units(text: &str) -> impl Iterator<Item = Result<u8>> + '_ {
    text.chars()
        .enumerate()
        .map(|(position, ch)| to_unit(ch, position))
}

/// Character whose code point is `unit`.
#[inline]
pub(crate) fn from_unit(unit: u8) -> char {
    char::from(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_units_roundtrip_latin1() {
        let text: String = (0u8..=255).map(from_unit).collect();
        let units: Vec<u8> = units(&text).collect::<Result<_>>().unwrap();
        assert_eq!(units, (0u8..=255).collect::<Vec<_>>());
    }

    #[test]
    fn test_units_rejects_wide_code_points() {
        let err = units("ok\u{100}").collect::<Result<Vec<u8>>>().unwrap_err();
        match err {
            Error::Range(RangeError::CodePoint { value, position }) => {
                assert_eq!(value, 0x100);
                assert_eq!(position, 2);
            }
            other => panic!("expected CodePoint error, got {:?}", other),
        }
    }
}
