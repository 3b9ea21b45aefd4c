//! Data source collaborators: asynchronous loading of one marketing
//! dataset snapshot from a local JSON file or an HTTP endpoint.

#![warn(clippy::unwrap_used)]

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use async_trait::async_trait;
use insights_core::config::SourceConfig;
use insights_core::{Dataset, InsightsError, InsightsResult, MarketingData};
use std::time::Instant;
use tracing::{info, warn};

/// Anything that can produce the marketing dataset.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch and decode the full dataset.
    async fn fetch(&self) -> InsightsResult<MarketingData>;

    /// Human-readable origin used in logs.
    fn describe(&self) -> String;
}

/// Build the source named by `config.location`: `http(s)://` URLs go over
/// the network, anything else is read as a file path.
pub fn from_config(config: &SourceConfig) -> InsightsResult<Box<dyn DataSource>> {
    match url::Url::parse(&config.location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpSource::new(url, config.timeout_ms)?))
        }
        _ => Ok(Box::new(FileSource::new(&config.location))),
    }
}

/// Fetch once and wrap the result as a fresh [`Dataset`].
///
/// Every failure is reported as [`InsightsError::DataLoad`]; callers surface
/// its message verbatim and do not retry.
pub async fn load_dataset(source: &dyn DataSource) -> InsightsResult<Dataset> {
    let started = Instant::now();
    match source.fetch().await {
        Ok(data) => {
            metrics::counter!("dataset.loads").increment(1);
            let dataset = Dataset::new(data);
            info!(
                source = %source.describe(),
                dataset_id = %dataset.id,
                campaigns = dataset.campaigns().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Marketing dataset loaded"
            );
            Ok(dataset)
        }
        Err(e) => {
            metrics::counter!("dataset.load_failures").increment(1);
            warn!(source = %source.describe(), error = %e, "Error loading marketing data");
            Err(match e {
                InsightsError::DataLoad(msg) => InsightsError::DataLoad(msg),
                other => InsightsError::DataLoad(other.user_message()),
            })
        }
    }
}

pub(crate) fn decode(body: &str) -> InsightsResult<MarketingData> {
    serde_json::from_str(body)
        .map_err(|e| InsightsError::DataLoad(format!("Malformed marketing data: {e}")))
}
