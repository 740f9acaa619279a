//! Compression stage of the storage pipeline.
//!
//! Text is compressed with a Huffman prefix code before it is mapped onto
//! bases. The output is a bit-string of `'0'`/`'1'` characters together with
//! the [`CodeTable`] the caller must keep to decompress later.
//!
//! # Examples
//!
//! ```rust
//! use dna_storage_sim::compression::{compress, decompress};
//!
//! let (table, bits) = compress("HELLO HELLO DNA").unwrap();
//! assert_eq!(decompress(&table, &bits).unwrap(), "HELLO HELLO DNA");
//! ```

pub mod huffman;
pub use huffman::{
    build_codes, build_frequency_table, build_tree, compress, decompress, encode_with, CodeTable,
    FrequencyTree,
};
