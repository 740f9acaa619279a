//! Pipeline configuration.

use crate::error::{RangeError, Result};
use serde::{Deserialize, Serialize};

/// Parameters for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Per-base substitution probability of the channel (0.0 to 1.0)
    pub error_rate: f64,
    /// Seed for the channel's random source; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            error_rate: 0.01,
            seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(RangeError::ErrorRate(self.error_rate).into());
        }
        Ok(())
    }
}
