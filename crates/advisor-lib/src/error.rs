//! Error taxonomy for the analysis core
//!
//! Configuration and contract violations fail fast with typed variants.
//! Partial data (missing list prices, empty sample sets) is handled by
//! exclusion during aggregation and never surfaces as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("lookback window must be at least one day, got {0}")]
    InvalidLookback(i64),

    #[error("core bounds are inverted: min {min} > max {max}")]
    InvertedCoreBounds { min: u32, max: u32 },

    #[error("memory bounds are inverted: min {min} > max {max}")]
    InvertedMemoryBounds { min: f64, max: f64 },

    #[error("family filter must contain at least one substring")]
    EmptyFamilyFilter,

    #[error("discount cutoff must be non-negative, got {0}")]
    NegativeCutoff(f64),

    #[error("instance type {0} reports a zero core count")]
    ZeroCoreCount(String),
}
