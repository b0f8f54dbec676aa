//! The advise command: the full catalog → filter → fetch → rank pipeline

use std::sync::Arc;

use advisor_lib::{
    analyze, fetch_price_histories, AnalysisConfig, FilterCriteria, InstanceCatalog,
};
use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;

use crate::client::PricingApiClient;
use crate::output::{self, OutputFormat};

/// Rank spot prices for the instance types matching the filter
pub async fn run(
    client: PricingApiClient,
    config: AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    // configuration problems must surface before any feed is contacted
    config.validate()?;

    let catalog = load_catalog(&client).await?;

    let criteria = FilterCriteria::from(&config);
    let eligible = criteria.eligible(&catalog);

    let since = (Utc::now() - Duration::days(config.lookback_days)).timestamp();
    let client = Arc::new(client);
    let histories = fetch_price_histories(client, &eligible, since).await;

    let ranked = analyze(&catalog, &histories, &config)?;
    output::print_ranked(&ranked, format);
    Ok(())
}

/// Load the instance catalog, pruned to spot-purchasable identifiers
pub async fn load_catalog(client: &PricingApiClient) -> Result<InstanceCatalog> {
    let metas = client.fetch_instance_types().await?;
    let available = client.fetch_spot_availability().await?;
    let catalog = InstanceCatalog::from_metadata(metas)?.retain_purchasable(&available);
    info!(instance_types = catalog.len(), "Instance catalog ready");
    Ok(catalog)
}
