//! Analysis core for the spot instance advisor
//!
//! This crate provides the core functionality for:
//! - The instance catalog and its availability pruning
//! - Eligibility filtering over instance metadata
//! - Per-zone aggregation of spot price history
//! - Ranking of priced candidates by discount and stability

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod pricing;

pub use catalog::InstanceCatalog;
pub use config::AnalysisConfig;
pub use error::AdvisorError;
pub use filter::{instance_arch, normalize_arch, FilterCriteria};
pub use models::*;
pub use pricing::{
    analyze, fetch_price_histories, rank, summarize_zones, AggregatorConfig, PriceFeed,
};
