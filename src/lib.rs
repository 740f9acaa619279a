//! dna-storage-sim: simulation of storing text as synthetic DNA.
//!
//! The codec core has four stages in three modules:
//! - [`compression`]: Huffman prefix coding of the text into a bit-string
//! - [`dna`]: mapping 8-bit units onto the bases A, C, G, T and a random
//!   substitution channel that corrupts them
//! - [`ecc`]: Hamming (7,4) protection with single-bit correction
//!
//! [`pipeline`] chains the stages into one run, [`history`] keeps run
//! records in a JSON file, and [`config`] holds the run parameters.
//!
//! All stages are pure functions of their input except the channel, whose
//! random source is always supplied by the caller.

pub mod compression;
pub mod config;
pub mod dna;
pub mod ecc;
pub mod error;
pub mod history;
pub mod pipeline;
mod units;

pub use config::PipelineConfig;
pub use error::{Error, RangeError, Result};
pub use pipeline::{run_pipeline, Pipeline, RunRecord};
