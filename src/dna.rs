//! DNA alphabet, base mapping and the substitution channel.
//!
//! - [`Nucleotide`]: the four-letter alphabet in its fixed order (A, C, G, T)
//! - [`BaseEncoder`]: 8-bit units to four bases each and back
//! - [`SubstitutionChannel`]: random per-base substitution noise
//!
//! # Examples
//!
//! ```rust
//! use dna_storage_sim::dna::{BaseEncoder, SubstitutionChannel};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let encoder = BaseEncoder::new();
//! let bases = encoder.encode("DNA").unwrap();
//! assert_eq!(bases, "CACACATGCAAC");
//!
//! let channel = SubstitutionChannel::new(0.0).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(1);
//! let received = channel.introduce_errors(&bases, &mut rng).unwrap();
//! assert_eq!(encoder.decode(&received).unwrap(), "DNA");
//! ```

pub mod channel;
pub mod encoder;
pub mod nucleotide;

pub use channel::{count_substitutions, SubstitutionChannel};
pub use encoder::{BaseEncoder, BASES_PER_UNIT};
pub use nucleotide::Nucleotide;
