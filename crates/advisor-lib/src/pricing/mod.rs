//! Price analysis pipeline
//!
//! The fetch contract, the zone aggregation step and the ranking step.
//! Fetching is the only concurrent stage; aggregation and ranking are a
//! single synchronous pass over the fetched histories.

mod aggregator;
mod ranker;

pub use aggregator::{summarize_zones, AggregatorConfig, PRICE_TOLERANCE};
pub use ranker::{compare, rank};

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::InstanceCatalog;
use crate::config::AnalysisConfig;
use crate::error::AdvisorError;
use crate::models::{PriceSample, RankedPrice};

pub use async_trait::async_trait;

/// Trait for spot price history sources
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the price history for one instance type, restricted to
    /// observations at or after `since` (unix seconds)
    async fn fetch_history(&self, instance_type_id: &str, since: i64) -> Result<Vec<PriceSample>>;
}

/// Fetch histories for all instance types concurrently
///
/// Results are keyed by identifier with no ordering guarantee. A failed
/// fetch logs a warning and leaves its identifier absent; it never aborts
/// the other fetches.
pub async fn fetch_price_histories<F>(
    feed: Arc<F>,
    instance_type_ids: &[String],
    since: i64,
) -> HashMap<String, Vec<PriceSample>>
where
    F: PriceFeed + ?Sized + 'static,
{
    let mut tasks = JoinSet::new();
    for instance_type_id in instance_type_ids {
        let feed = Arc::clone(&feed);
        let instance_type_id = instance_type_id.clone();
        tasks.spawn(async move {
            let result = feed.fetch_history(&instance_type_id, since).await;
            (instance_type_id, result)
        });
    }

    let mut histories = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((instance_type_id, Ok(samples))) => {
                histories.insert(instance_type_id, samples);
            }
            Ok((instance_type_id, Err(error))) => {
                warn!(
                    instance_type = %instance_type_id,
                    error = %error,
                    "Price history fetch failed, excluding instance type"
                );
            }
            Err(error) => warn!(error = %error, "Price history task failed"),
        }
    }
    info!(
        fetched = histories.len(),
        requested = instance_type_ids.len(),
        "Fetched spot price histories"
    );
    histories
}

/// Aggregate every fetched instance type present in the catalog, then rank
///
/// The configuration is validated before any sample is touched. Instance
/// types missing from the catalog, or yielding no zone summary, simply do
/// not appear in the output.
pub fn analyze(
    catalog: &InstanceCatalog,
    histories: &HashMap<String, Vec<PriceSample>>,
    config: &AnalysisConfig,
) -> Result<Vec<RankedPrice>, AdvisorError> {
    config.validate()?;

    let aggregator = AggregatorConfig::default();
    let mut summaries = Vec::new();
    for (instance_type_id, samples) in histories {
        let Some(meta) = catalog.get(instance_type_id) else {
            continue;
        };
        summaries.extend(summarize_zones(meta, samples, &aggregator)?);
    }
    info!(compared = summaries.len(), "Aggregated zone price summaries");

    Ok(rank(summaries, config.discount_cutoff, config.result_limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstanceMeta, PriceClass};
    use anyhow::anyhow;

    struct StaticFeed {
        histories: HashMap<String, Vec<PriceSample>>,
    }

    #[async_trait]
    impl PriceFeed for StaticFeed {
        async fn fetch_history(
            &self,
            instance_type_id: &str,
            _since: i64,
        ) -> Result<Vec<PriceSample>> {
            self.histories
                .get(instance_type_id)
                .cloned()
                .ok_or_else(|| anyhow!("no history for {instance_type_id}"))
        }
    }

    fn meta(id: &str, cores: u32) -> InstanceMeta {
        InstanceMeta {
            instance_type_id: id.to_string(),
            instance_family: "ecs.n4".to_string(),
            cpu_core_count: cores,
            memory_size_gb: 8.0,
            cpu_architecture: String::new(),
        }
    }

    fn sample(zone: &str, spot: f64, origin: f64) -> PriceSample {
        PriceSample {
            zone_id: zone.to_string(),
            spot_price: spot,
            origin_price: Some(origin),
            timestamp: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_fetch_keys_results_by_identifier() {
        let feed = Arc::new(StaticFeed {
            histories: HashMap::from([
                ("ecs.a".to_string(), vec![sample("zone-a", 1.0, 10.0)]),
                ("ecs.b".to_string(), vec![sample("zone-a", 2.0, 10.0)]),
            ]),
        });
        let ids = vec!["ecs.a".to_string(), "ecs.b".to_string()];
        let histories = fetch_price_histories(feed, &ids, 0).await;
        assert_eq!(histories.len(), 2);
        assert_eq!(histories["ecs.a"].len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_identifier_absent() {
        let feed = Arc::new(StaticFeed {
            histories: HashMap::from([(
                "ecs.a".to_string(),
                vec![sample("zone-a", 1.0, 10.0)],
            )]),
        });
        let ids = vec!["ecs.a".to_string(), "ecs.missing".to_string()];
        let histories = fetch_price_histories(feed, &ids, 0).await;
        assert_eq!(histories.len(), 1);
        assert!(!histories.contains_key("ecs.missing"));
    }

    #[test]
    fn test_analyze_ranks_across_zones() {
        let catalog = InstanceCatalog::from_metadata([meta("ecs.x.large", 2)]).unwrap();
        let mut zone_a = vec![sample("zone-a", 1.0, 10.0); 5];
        zone_a.push(sample("zone-b", 8.0, 10.0));
        let histories = HashMap::from([("ecs.x.large".to_string(), zone_a)]);

        let ranked = analyze(&catalog, &histories, &AnalysisConfig::default()).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].summary.zone_id, "zone-a");
        assert_eq!(ranked[0].class, PriceClass::Favorable);
        assert!((ranked[0].summary.stability - 100.0).abs() < 1e-9);
        assert_eq!(ranked[1].summary.zone_id, "zone-b");
        assert_eq!(ranked[1].class, PriceClass::Unfavorable);
    }

    #[test]
    fn test_analyze_respects_the_result_limit() {
        let catalog = InstanceCatalog::from_metadata([meta("ecs.x.large", 2)]).unwrap();
        let histories = HashMap::from([(
            "ecs.x.large".to_string(),
            vec![sample("zone-a", 1.0, 10.0), sample("zone-b", 8.0, 10.0)],
        )]);
        let config = AnalysisConfig {
            result_limit: 1,
            ..Default::default()
        };

        let ranked = analyze(&catalog, &histories, &config).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].summary.zone_id, "zone-a");
    }

    #[test]
    fn test_analyze_skips_identifiers_missing_from_catalog() {
        let catalog = InstanceCatalog::from_metadata([meta("ecs.x.large", 2)]).unwrap();
        let histories = HashMap::from([
            ("ecs.x.large".to_string(), vec![sample("zone-a", 1.0, 10.0)]),
            ("ecs.unknown".to_string(), vec![sample("zone-a", 1.0, 10.0)]),
        ]);

        let ranked = analyze(&catalog, &histories, &AnalysisConfig::default()).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].summary.instance_type_id, "ecs.x.large");
    }

    #[test]
    fn test_analyze_fails_fast_on_invalid_config() {
        let catalog = InstanceCatalog::from_metadata([meta("ecs.x.large", 2)]).unwrap();
        let config = AnalysisConfig {
            lookback_days: 0,
            ..Default::default()
        };
        let result = analyze(&catalog, &HashMap::new(), &config);
        assert!(matches!(result, Err(AdvisorError::InvalidLookback(0))));
    }

    #[test]
    fn test_analyze_empty_input_is_empty_output() {
        let catalog = InstanceCatalog::from_metadata(Vec::<InstanceMeta>::new()).unwrap();
        let ranked = analyze(&catalog, &HashMap::new(), &AnalysisConfig::default()).unwrap();
        assert!(ranked.is_empty());
    }
}
