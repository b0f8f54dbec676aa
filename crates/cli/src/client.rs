//! HTTP client for the pricing API
//!
//! Fetches the raw feeds the analysis core consumes: instance type
//! metadata, spot availability, and per-instance-type spot price history.
//! Wire records are converted into `advisor-lib` models here, and the
//! lookback window is applied to fetched samples before they reach the
//! aggregator.

use std::collections::HashSet;
use std::time::Duration;

use advisor_lib::pricing::async_trait;
use advisor_lib::{InstanceMeta, PriceFeed, PriceSample};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;
use url::Url;

/// Client for the pricing API
pub struct PricingApiClient {
    client: Client,
    base_url: Url,
    region: String,
}

impl PricingApiClient {
    /// Create a new pricing API client
    pub fn new(base_url: &str, region: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self {
            client,
            base_url,
            region: region.to_string(),
        })
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Fetch the instance type metadata feed for the region
    pub async fn fetch_instance_types(&self) -> Result<Vec<InstanceMeta>> {
        let path = format!("api/v1/regions/{}/instance-types", self.region);
        let result: InstanceTypeList = self.get(&path).await?;
        Ok(result
            .instance_types
            .into_iter()
            .map(InstanceMeta::from)
            .collect())
    }

    /// Fetch the identifiers purchasable under the spot strategy
    pub async fn fetch_spot_availability(&self) -> Result<HashSet<String>> {
        let path = format!("api/v1/regions/{}/spot-availability", self.region);
        let result: AvailabilityList = self.get(&path).await?;
        Ok(result.instance_type_ids.into_iter().collect())
    }
}

#[async_trait]
impl PriceFeed for PricingApiClient {
    async fn fetch_history(&self, instance_type_id: &str, since: i64) -> Result<Vec<PriceSample>> {
        let since_rfc3339 = Utc
            .timestamp_opt(since, 0)
            .single()
            .context("Invalid window start")?
            .to_rfc3339();
        let path = format!(
            "api/v1/regions/{}/spot-history/{}?since={}",
            self.region, instance_type_id, since_rfc3339
        );
        let result: SpotHistoryList = self.get(&path).await?;

        // window exclusion happens here; the aggregator assumes it
        let samples: Vec<PriceSample> = result
            .samples
            .into_iter()
            .filter_map(|record| record.into_sample())
            .filter(|sample| sample.timestamp >= since)
            .collect();
        debug!(
            instance_type = %instance_type_id,
            samples = samples.len(),
            "Fetched price history"
        );
        Ok(samples)
    }
}

// Wire types for the pricing API

#[derive(Debug, Clone, Deserialize)]
struct InstanceTypeList {
    instance_types: Vec<InstanceTypeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstanceTypeRecord {
    instance_type_id: String,
    instance_type_family: String,
    cpu_core_count: u32,
    memory_size: f64,
    #[serde(default)]
    cpu_architecture: String,
}

impl From<InstanceTypeRecord> for InstanceMeta {
    fn from(record: InstanceTypeRecord) -> Self {
        Self {
            instance_type_id: record.instance_type_id,
            instance_family: record.instance_type_family,
            cpu_core_count: record.cpu_core_count,
            memory_size_gb: record.memory_size,
            cpu_architecture: record.cpu_architecture,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AvailabilityList {
    instance_type_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SpotHistoryList {
    samples: Vec<SpotPriceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct SpotPriceRecord {
    zone_id: String,
    spot_price: f64,
    #[serde(default)]
    origin_price: Option<f64>,
    timestamp: String,
}

impl SpotPriceRecord {
    /// Convert a wire record, dropping samples with unparseable timestamps
    fn into_sample(self) -> Option<PriceSample> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()?
            .timestamp();
        Some(PriceSample {
            zone_id: self.zone_id,
            spot_price: self.spot_price,
            origin_price: self.origin_price,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_instance_types() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/regions/cn-hangzhou/instance-types")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"instance_types": [
                    {"instance_type_id": "ecs.n4.large",
                     "instance_type_family": "ecs.n4",
                     "cpu_core_count": 2,
                     "memory_size": 4.0},
                    {"instance_type_id": "ecs.c6g.xlarge",
                     "instance_type_family": "ecs.c6g",
                     "cpu_core_count": 4,
                     "memory_size": 8.0,
                     "cpu_architecture": "arm64"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = PricingApiClient::new(&server.url(), "cn-hangzhou").unwrap();
        let metas = client.fetch_instance_types().await.unwrap();

        mock.assert_async().await;
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].instance_type_id, "ecs.n4.large");
        assert_eq!(metas[0].cpu_architecture, "");
        assert_eq!(metas[1].cpu_architecture, "arm64");
    }

    #[tokio::test]
    async fn test_fetch_spot_availability() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/regions/cn-hangzhou/spot-availability")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"instance_type_ids": ["ecs.n4.large", "ecs.g6.large"]}"#)
            .create_async()
            .await;

        let client = PricingApiClient::new(&server.url(), "cn-hangzhou").unwrap();
        let available = client.fetch_spot_availability().await.unwrap();

        assert_eq!(available.len(), 2);
        assert!(available.contains("ecs.n4.large"));
    }

    #[tokio::test]
    async fn test_fetch_history_applies_the_window() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(
                    "/api/v1/regions/cn-hangzhou/spot-history/ecs.n4.large.*".to_string(),
                ),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"samples": [
                    {"zone_id": "cn-hangzhou-a", "spot_price": 0.5,
                     "origin_price": 2.0, "timestamp": "2024-01-10T00:00:00Z"},
                    {"zone_id": "cn-hangzhou-a", "spot_price": 0.4,
                     "origin_price": 2.0, "timestamp": "2023-12-01T00:00:00Z"},
                    {"zone_id": "cn-hangzhou-a", "spot_price": 0.6,
                     "timestamp": "not-a-timestamp"}
                ]}"#,
            )
            .create_async()
            .await;

        let since = DateTime::parse_from_rfc3339("2024-01-05T00:00:00Z")
            .unwrap()
            .timestamp();
        let client = PricingApiClient::new(&server.url(), "cn-hangzhou").unwrap();
        let samples = client.fetch_history("ecs.n4.large", since).await.unwrap();

        // the stale sample and the malformed one are excluded
        assert_eq!(samples.len(), 1);
        assert!((samples[0].spot_price - 0.5).abs() < 1e-9);
        assert_eq!(samples[0].origin_price, Some(2.0));
    }

    #[tokio::test]
    async fn test_api_error_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/regions/cn-hangzhou/instance-types")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = PricingApiClient::new(&server.url(), "cn-hangzhou").unwrap();
        let result = client.fetch_instance_types().await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(PricingApiClient::new("not a url", "cn-hangzhou").is_err());
    }
}
