//! Ordering, bounding and classification of price summaries

use std::cmp::Ordering;

use crate::models::{PriceClass, PriceSummary, RankedPrice};

/// Total order over summaries: discount ascending, stability descending,
/// then instance type and zone identifiers for determinism
pub fn compare(a: &PriceSummary, b: &PriceSummary) -> Ordering {
    a.discount
        .total_cmp(&b.discount)
        .then_with(|| b.stability.total_cmp(&a.stability))
        .then_with(|| a.instance_type_id.cmp(&b.instance_type_id))
        .then_with(|| a.zone_id.cmp(&b.zone_id))
}

/// Order the full summary set, keep the first `limit` records and tag
/// each against the discount cutoff
///
/// The cutoff classifies, it never filters: favorable and unfavorable
/// records both appear in the bounded result. A non-positive limit keeps
/// nothing.
pub fn rank(mut summaries: Vec<PriceSummary>, cutoff: f64, limit: i64) -> Vec<RankedPrice> {
    summaries.sort_by(compare);
    let take = usize::try_from(limit).unwrap_or(0);
    summaries
        .into_iter()
        .take(take)
        .map(|summary| RankedPrice {
            class: PriceClass::from_discount(summary.discount, cutoff),
            summary,
        })
        .collect()
}
