use std::fmt;

use serde::{Deserialize, Serialize};

/// A DNA base in the fixed alphabet order used throughout the crate.
///
/// The index of each variant is the 2-bit value it carries when bytes are
/// mapped onto bases: A=0, C=1, G=2, T=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// All bases in index order.
    pub const ALL: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    /// Convert from a 2-bit index (0-3).
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::A),
            1 => Some(Self::C),
            2 => Some(Self::G),
            3 => Some(Self::T),
            _ => None,
        }
    }

    /// Base for the lowest two bits of `bits`.
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    #[inline(always)]
    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Convert from an uppercase base letter. Returns `None` for anything else.
    #[inline]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(Self::A),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        }
    }

    /// The base `offset` steps further along the alphabet, wrapping around.
    /// Offsets 1-3 always give a different base.
    #[inline(always)]
    pub const fn shifted(self, offset: u8) -> Self {
        Self::from_bits(self.to_index().wrapping_add(offset))
    }
}

impl From<Nucleotide> for char {
    #[inline(always)]
    fn from(base: Nucleotide) -> char {
        base.to_char()
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
