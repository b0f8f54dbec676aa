//! The types command: eligibility filtering without price analysis

use advisor_lib::{AnalysisConfig, FilterCriteria, InstanceMeta};
use anyhow::Result;

use crate::client::PricingApiClient;
use crate::commands::advise::load_catalog;
use crate::output::{self, OutputFormat};

/// List the instance types matching the filter
pub async fn run(
    client: PricingApiClient,
    config: AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    config.validate()?;

    let catalog = load_catalog(&client).await?;

    let criteria = FilterCriteria::from(&config);
    let eligible = criteria.eligible(&catalog);

    let metas: Vec<&InstanceMeta> = eligible
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect();
    output::print_instance_types(&metas, format);
    Ok(())
}
