//! Substitution noise on base sequences.
//!
//! Every base is corrupted independently: with probability `error_rate` it
//! is replaced by one of the three other bases, chosen uniformly. The random
//! source is passed in by the caller, so a seeded generator makes a run
//! reproducible.

use super::Nucleotide;
use crate::error::{Error, RangeError, Result};
use rand::Rng;

/// Independent per-base substitution channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubstitutionChannel {
    error_rate: f64,
}

impl SubstitutionChannel {
    /// Create a channel that substitutes each base with probability `error_rate`.
    ///
    /// # Errors
    ///
    /// `RangeError::ErrorRate` unless `error_rate` is a finite value in [0, 1].
    pub fn new(error_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(RangeError::ErrorRate(error_rate).into());
        }
        Ok(Self { error_rate })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Pass `sequence` through the channel.
    ///
    /// # Errors
    ///
    /// `Error::MalformedInput` if a symbol is not one of A, C, G, T.
    pub fn introduce_errors<R: Rng + ?Sized>(&self, sequence: &str, rng: &mut R) -> Result<String> {
        let mut corrupted = String::with_capacity(sequence.len());
        for (position, symbol) in sequence.chars().enumerate() {
            let base = Nucleotide::from_char(symbol).ok_or_else(|| {
                Error::malformed(format!("invalid base {symbol:?} at position {position}"))
            })?;
            corrupted.push(self.transmit(base, rng).to_char());
        }
        Ok(corrupted)
    }

    /// Send a single base through the channel.
    #[inline]
    pub fn transmit<R: Rng + ?Sized>(&self, base: Nucleotide, rng: &mut R) -> Nucleotide {
        if rng.gen::<f64>() < self.error_rate {
            base.shifted(rng.gen_range(1..4))
        } else {
            base
        }
    }
}

impl Default for SubstitutionChannel {
    fn default() -> Self {
        Self { error_rate: 0.01 }
    }
}

/// Number of positions at which `sent` and `received` differ.
///
/// Sequences of different lengths are compared over their common prefix.
pub fn count_substitutions(sent: &str, received: &str) -> usize {
    sent.chars()
        .zip(received.chars())
        .filter(|(a, b)| a != b)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn random_sequence(len: usize, rng: &mut ChaCha20Rng) -> String {
        (0..len)
            .map(|_| Nucleotide::from_bits(rng.gen::<u8>()).to_char())
            .collect()
    }

    #[test]
    fn test_rate_validation() {
        assert!(SubstitutionChannel::new(0.0).is_ok());
        assert!(SubstitutionChannel::new(1.0).is_ok());
        assert!(SubstitutionChannel::new(0.25).is_ok());
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            match SubstitutionChannel::new(bad) {
                Err(Error::Range(RangeError::ErrorRate(_))) => {}
                other => panic!("expected ErrorRate for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let sequence = random_sequence(2_000, &mut rng);
        let channel = SubstitutionChannel::new(0.0).unwrap();
        let received = channel.introduce_errors(&sequence, &mut rng).unwrap();
        assert_eq!(received, sequence);
    }

    #[test]
    fn test_full_rate_changes_every_base() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let sequence = random_sequence(2_000, &mut rng);
        let channel = SubstitutionChannel::new(1.0).unwrap();
        let received = channel.introduce_errors(&sequence, &mut rng).unwrap();
        assert_eq!(received.len(), sequence.len());
        assert_eq!(count_substitutions(&sequence, &received), sequence.len());
    }

    #[test]
    fn test_observed_rate_matches_configured() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let sequence = random_sequence(50_000, &mut rng);
        for rate in [0.01, 0.1, 0.5] {
            let channel = SubstitutionChannel::new(rate).unwrap();
            let received = channel.introduce_errors(&sequence, &mut rng).unwrap();
            let observed = count_substitutions(&sequence, &received) as f64 / 50_000.0;
            assert_abs_diff_eq!(observed, rate, epsilon = 0.01);
        }
    }

    #[test]
    fn test_replacements_are_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let channel = SubstitutionChannel::new(1.0).unwrap();
        let mut counts = [0usize; 4];
        for _ in 0..30_000 {
            counts[channel.transmit(Nucleotide::A, &mut rng).to_index() as usize] += 1;
        }
        assert_eq!(counts[0], 0);
        for &count in &counts[1..] {
            assert_abs_diff_eq!(count as f64 / 30_000.0, 1.0 / 3.0, epsilon = 0.02);
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let channel = SubstitutionChannel::new(0.2).unwrap();
        let sequence = "ACGT".repeat(100);
        let first = channel
            .introduce_errors(&sequence, &mut ChaCha20Rng::seed_from_u64(9))
            .unwrap();
        let second = channel
            .introduce_errors(&sequence, &mut ChaCha20Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_symbol() {
        let channel = SubstitutionChannel::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(
            channel.introduce_errors("ACXT", &mut rng),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_empty_sequence() {
        let channel = SubstitutionChannel::new(0.5).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(channel.introduce_errors("", &mut rng).unwrap(), "");
    }
}
