//! End-to-end storage simulation.
//!
//! A run pushes one text through every stage and collects the intermediate
//! values into a [`RunRecord`]:
//!
//! ```text
//! text -> compress -> bits -> base encode -> dna -> channel -> corrupted dna
//!                       \-> hamming encode -> ecc bits -> hamming decode -> decompress
//! ```
//!
//! The Hamming code protects the compressed bits, not the bases that go
//! through the channel, so channel noise never reaches the decoder and
//! `errors_corrected` stays zero unless the ECC bits are tampered with
//! separately.

use crate::compression::{compress, decompress, CodeTable};
use crate::config::PipelineConfig;
use crate::dna::{count_substitutions, BaseEncoder, SubstitutionChannel};
use crate::ecc::HammingCode;
use crate::error::Result;
use crate::units::units;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything one run produced, in the shape the run-history store keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: String,
    pub input: String,
    pub compressed_bits: String,
    pub dna_seq: String,
    pub corrupted_dna: String,
    pub ecc_bits: String,
    pub decompressed: String,
    pub errors_corrected: usize,
    pub batch_id: Option<usize>,
    /// Code table needed to decompress `compressed_bits`. Not persisted: a
    /// record loaded from the history comes back with an empty table and
    /// cannot decompress its own bits, and so no longer compares equal to
    /// the record that was stored.
    #[serde(skip)]
    pub code_table: CodeTable,
}

impl RunRecord {
    /// Key under which the run is stored: `run_<timestamp>`, or
    /// `batch_<id>_<timestamp>` for batch lines.
    pub fn key(&self) -> String {
        match self.batch_id {
            Some(id) => format!("batch_{}_{}", id, self.timestamp),
            None => format!("run_{}", self.timestamp),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            compressed_bits: self.compressed_bits.len(),
            dna_len: self.dna_seq.len(),
            substitutions: count_substitutions(&self.dna_seq, &self.corrupted_dna),
            ecc_bits: self.ecc_bits.len(),
            errors_corrected: self.errors_corrected,
            recovered: self.decompressed == self.input,
        }
    }
}

/// Sizes and counts of a run, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub compressed_bits: usize,
    pub dna_len: usize,
    pub substitutions: usize,
    pub ecc_bits: usize,
    pub errors_corrected: usize,
    pub recovered: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Compressed: {} bits", self.compressed_bits)?;
        writeln!(f, "  DNA length: {}", self.dna_len)?;
        writeln!(f, "  Substituted bases: {}", self.substitutions)?;
        writeln!(f, "  ECC bits: {}", self.ecc_bits)?;
        write!(f, "  Errors corrected: {}", self.errors_corrected)
    }
}

/// The codec stages, free of any random state.
#[derive(Debug, Clone, Copy)]
struct Stages {
    encoder: BaseEncoder,
    ecc: HammingCode,
    channel: SubstitutionChannel,
}

impl Stages {
    fn run<R: Rng + ?Sized>(
        &self,
        text: &str,
        batch_id: Option<usize>,
        rng: &mut R,
    ) -> Result<RunRecord> {
        units(text).try_for_each(|unit| unit.map(drop))?;
        let (code_table, compressed_bits) = compress(text)?;
        debug!(
            "compressed {} chars into {} bits ({} symbols)",
            text.chars().count(),
            compressed_bits.len(),
            code_table.len()
        );

        let dna_seq = self.encoder.encode(&compressed_bits)?;
        debug!(
            "mapped onto {} bases (packed mapping would need {})",
            dna_seq.len(),
            BaseEncoder::packed_len(compressed_bits.len())
        );

        let ecc_bits = self.ecc.encode(&compressed_bits)?;
        let corrupted_dna = self.channel.introduce_errors(&dna_seq, rng)?;
        debug!(
            "channel at rate {} substituted {} bases",
            self.channel.error_rate(),
            count_substitutions(&dna_seq, &corrupted_dna)
        );

        let recovered = self.ecc.decode(&ecc_bits)?;
        debug!("ecc corrected {} codewords", recovered.errors_corrected);
        let decompressed = decompress(&code_table, &recovered.text)?;

        Ok(RunRecord {
            timestamp: timestamp(),
            input: text.to_string(),
            compressed_bits,
            dna_seq,
            corrupted_dna,
            ecc_bits,
            decompressed,
            errors_corrected: recovered.errors_corrected,
            batch_id,
            code_table,
        })
    }
}

/// Runs texts through the storage simulation.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    stages: Stages,
    /// Random source for single runs
    rng: ChaCha20Rng,
}

impl Pipeline {
    /// Create a pipeline, seeding its random source from the config or, if
    /// no seed is set, from OS entropy.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Ok(Self {
            config,
            stages: Stages {
                encoder: BaseEncoder::new(),
                ecc: HammingCode::new(),
                channel: SubstitutionChannel::new(config.error_rate)?,
            },
            rng,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run `text` through every stage using the pipeline's own random source.
    ///
    /// Every character must have a code point in 0..=255.
    pub fn run(&mut self, text: &str) -> Result<RunRecord> {
        self.stages.run(text, None, &mut self.rng)
    }

    /// Run `text` with a caller-supplied random source.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        batch_id: Option<usize>,
        rng: &mut R,
    ) -> Result<RunRecord> {
        self.stages.run(text, batch_id, rng)
    }

    /// Run every non-blank line of a batch, in parallel.
    ///
    /// Lines are trimmed; the batch id is the line's index in `lines`. With
    /// a configured seed, line `i` draws from ChaCha stream `i + 1` of that
    /// seed, so results do not depend on scheduling. Stream 0 belongs to
    /// single runs.
    pub fn run_batch<S: AsRef<str> + Sync>(&self, lines: &[S]) -> Vec<Result<RunRecord>> {
        lines
            .par_iter()
            .enumerate()
            .filter(|(_, line)| !line.as_ref().trim().is_empty())
            .map(|(idx, line)| {
                let mut rng = self.line_rng(idx);
                self.stages.run(line.as_ref().trim(), Some(idx), &mut rng)
            })
            .collect()
    }

    fn line_rng(&self, idx: usize) -> ChaCha20Rng {
        match self.config.seed {
            Some(seed) => {
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                rng.set_stream(idx as u64 + 1);
                rng
            }
            None => ChaCha20Rng::from_entropy(),
        }
    }
}

/// Local time in ISO 8601 with microseconds.
fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Run a single text through a fresh pipeline.
pub fn run_pipeline(text: &str, config: PipelineConfig) -> Result<RunRecord> {
    Pipeline::new(config)?.run(text)
}
