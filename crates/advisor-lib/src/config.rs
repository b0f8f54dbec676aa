//! Caller-supplied analysis parameters

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Parameters for one advisor run
///
/// Validated before any fetch or aggregation happens; a value that would
/// make a downstream computation undefined is rejected here, never
/// silently coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub min_cores: u32,
    pub max_cores: u32,
    pub min_memory_gb: f64,
    pub max_memory_gb: f64,
    /// Family substrings, already split; an empty string element matches
    /// every identifier, an empty list matches none
    pub families: Vec<String>,
    /// Blank disables the architecture filter
    pub arch: String,
    /// Price history window in days
    pub lookback_days: i64,
    /// 0-10 discount threshold for the favorable classification
    pub discount_cutoff: f64,
    /// Records retained after ranking; zero or negative keeps none
    pub result_limit: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_cores: 1,
            max_cores: 32,
            min_memory_gb: 2.0,
            max_memory_gb: 64.0,
            families: vec![String::new()],
            arch: String::new(),
            lookback_days: 7,
            discount_cutoff: 2.0,
            result_limit: 20,
        }
    }
}

impl AnalysisConfig {
    /// Reject parameter combinations that would make the run undefined
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.lookback_days < 1 {
            return Err(AdvisorError::InvalidLookback(self.lookback_days));
        }
        if self.min_cores > self.max_cores {
            return Err(AdvisorError::InvertedCoreBounds {
                min: self.min_cores,
                max: self.max_cores,
            });
        }
        if self.min_memory_gb > self.max_memory_gb {
            return Err(AdvisorError::InvertedMemoryBounds {
                min: self.min_memory_gb,
                max: self.max_memory_gb,
            });
        }
        if self.families.is_empty() {
            return Err(AdvisorError::EmptyFamilyFilter);
        }
        if self.discount_cutoff < 0.0 {
            return Err(AdvisorError::NegativeCutoff(self.discount_cutoff));
        }
        Ok(())
    }
}
