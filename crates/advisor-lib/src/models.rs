//! Core data models for the spot advisor

use serde::{Deserialize, Serialize};

/// Static descriptor of one instance type, as supplied by the metadata feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceMeta {
    pub instance_type_id: String,
    pub instance_family: String,
    pub cpu_core_count: u32,
    pub memory_size_gb: f64,
    /// Architecture tag as reported by the feed; may be blank
    pub cpu_architecture: String,
}

/// One historical spot price observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSample {
    pub zone_id: String,
    /// Spot market price, currency per hour
    pub spot_price: f64,
    /// On-demand list price; absent when the feed did not report one
    pub origin_price: Option<f64>,
    pub timestamp: i64,
}

/// Aggregated price statistics for one (instance type, zone) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSummary {
    pub instance_type_id: String,
    pub zone_id: String,
    /// Representative spot price divided by core count
    pub price_per_core: f64,
    /// 0-10 scale; 10 = full list price, lower is cheaper
    pub discount: f64,
    /// 0-100; share of the sampled window consistent with the
    /// representative price
    pub stability: f64,
    pub cpu_core_count: u32,
    pub memory_size_gb: f64,
    pub instance_family: String,
    /// Canonical architecture (x86_64 or arm64 unless the feed reported
    /// something else)
    pub arch: String,
}

/// Classification of a ranked record against the discount cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceClass {
    Favorable,
    Unfavorable,
}

impl PriceClass {
    /// Favorable when the discount is at or below the cutoff
    pub fn from_discount(discount: f64, cutoff: f64) -> Self {
        if discount <= cutoff {
            PriceClass::Favorable
        } else {
            PriceClass::Unfavorable
        }
    }
}

/// A price summary annotated with its cutoff classification
///
/// The cutoff never removes records from the ranked view; it only tags
/// them for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPrice {
    pub summary: PriceSummary,
    pub class: PriceClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_discount() {
        assert_eq!(PriceClass::from_discount(1.0, 2.0), PriceClass::Favorable);
        assert_eq!(PriceClass::from_discount(2.0, 2.0), PriceClass::Favorable);
        assert_eq!(PriceClass::from_discount(2.1, 2.0), PriceClass::Unfavorable);
    }
}
