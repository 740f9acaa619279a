//! Error types for the DNA storage simulator.
//!
//! Every codec stage fails fast with a structured error instead of emitting
//! partial output. The variants map onto three failure classes:
//! - malformed input (lengths not aligned to a block, foreign symbols)
//! - ambiguous prefix decoding (unmatched trailing bits)
//! - out-of-range values (code points, error rates, missing table entries)
//!
//! A double-bit error inside one Hamming codeword is the one failure the
//! codec cannot see: it is silently miscorrected and never surfaces here.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input whose shape is wrong for the stage (length, alphabet, table).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Prefix decoding ran out of input with bits still unmatched.
    #[error("ambiguous decode: {trailing:?} left unmatched at bit {position}")]
    DecodeAmbiguity {
        /// Bit offset where the unmatched run starts
        position: usize,
        /// The unmatched bits
        trailing: String,
    },

    /// A value outside the range a stage accepts.
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// Run-history file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Run-history file could not be (de)serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Values outside an accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    /// Character whose code point does not fit in one 8-bit unit
    #[error("code point {value:#x} at position {position} is outside 0..=255")]
    CodePoint { value: u32, position: usize },

    /// Substitution probability outside [0, 1]
    #[error("error rate {0} is outside [0, 1]")]
    ErrorRate(f64),

    /// Symbol with no entry in the code table used for encoding
    #[error("symbol {0:?} has no entry in the code table")]
    MissingSymbol(char),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// True for the out-of-range class of failures.
    pub fn is_range(&self) -> bool {
        matches!(self, Error::Range(_))
    }
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
