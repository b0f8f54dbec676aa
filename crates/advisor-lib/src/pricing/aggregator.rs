//! Zone-level reduction of raw price samples
//!
//! Partitions one instance type's price history by availability zone and
//! reduces each partition into a single comparable summary: representative
//! spot price, 0-10 discount against list price, 0-100 stability, and the
//! effective price per core.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::AdvisorError;
use crate::filter::instance_arch;
use crate::models::{InstanceMeta, PriceSample, PriceSummary};

/// Default tolerance band around the representative price
pub const PRICE_TOLERANCE: f64 = 0.10;

/// Aggregation constants
///
/// Parameterized for tests; callers get the fixed defaults.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Fractional band around the representative price a sample must fall
    /// inside to count toward stability
    pub price_tolerance: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            price_tolerance: PRICE_TOLERANCE,
        }
    }
}

/// Reduce one instance type's samples into one summary per zone
///
/// Exactly one summary per zone represented in the input, except zones
/// where no sample carries a list price (or the list mean is zero), which
/// are skipped. Samples are assumed to lie within the lookback window
/// already; window exclusion belongs to the fetch stage.
pub fn summarize_zones(
    meta: &InstanceMeta,
    samples: &[PriceSample],
    config: &AggregatorConfig,
) -> Result<Vec<PriceSummary>, AdvisorError> {
    if meta.cpu_core_count == 0 {
        return Err(AdvisorError::ZeroCoreCount(meta.instance_type_id.clone()));
    }

    let mut zones: BTreeMap<&str, Vec<&PriceSample>> = BTreeMap::new();
    for sample in samples {
        zones.entry(sample.zone_id.as_str()).or_default().push(sample);
    }

    let mut summaries = Vec::with_capacity(zones.len());
    for (zone_id, group) in zones {
        let spot_prices: Vec<f64> = group.iter().map(|s| s.spot_price).collect();
        let representative = mean(&spot_prices);

        let list_prices: Vec<f64> = group.iter().filter_map(|s| s.origin_price).collect();
        if list_prices.is_empty() {
            debug!(
                instance_type = %meta.instance_type_id,
                zone = zone_id,
                "No list price in zone group, skipping"
            );
            continue;
        }
        let list = mean(&list_prices);
        if list < f64::EPSILON {
            debug!(
                instance_type = %meta.instance_type_id,
                zone = zone_id,
                "Zero list price in zone group, skipping"
            );
            continue;
        }

        summaries.push(PriceSummary {
            instance_type_id: meta.instance_type_id.clone(),
            zone_id: zone_id.to_string(),
            price_per_core: representative / f64::from(meta.cpu_core_count),
            discount: 10.0 * representative / list,
            stability: stability(&spot_prices, representative, config.price_tolerance),
            cpu_core_count: meta.cpu_core_count,
            memory_size_gb: meta.memory_size_gb,
            instance_family: meta.instance_family.clone(),
            arch: instance_arch(meta),
        });
    }
    Ok(summaries)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Share of samples within the tolerance band around the representative
/// price, as a 0-100 percentage
///
/// A single-sample group scores 100 by construction; minimal group size
/// is the downstream confidence signal, not a score penalty.
fn stability(prices: &[f64], representative: f64, tolerance: f64) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let band = tolerance * representative;
    let inside = prices
        .iter()
        .filter(|price| (**price - representative).abs() <= band)
        .count();
    100.0 * inside as f64 / prices.len() as f64
}
