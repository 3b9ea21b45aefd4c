//! HTTP(S) source: a single GET returning the dataset as JSON.

use crate::{decode, DataSource};
use async_trait::async_trait;
use insights_core::{InsightsError, InsightsResult, MarketingData};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
    timeout_ms: u64,
}

impl HttpSource {
    pub fn new(url: Url, timeout_ms: u64) -> InsightsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| InsightsError::DataLoad(format!("Cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            timeout_ms,
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> InsightsResult<MarketingData> {
        debug!(url = %self.url, "Requesting marketing data");

        let response = self.client.get(self.url.clone()).send().await.map_err(|e| {
            let msg = if e.is_timeout() {
                format!("Timed out after {} ms waiting for {}", self.timeout_ms, self.url)
            } else if e.is_connect() {
                format!("Cannot connect to {}: {e}", self.url)
            } else {
                format!("Request to {} failed: {e}", self.url)
            };
            InsightsError::DataLoad(msg)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightsError::DataLoad(format!(
                "Failed to fetch marketing data (HTTP {})",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| InsightsError::DataLoad(format!("Cannot read response body: {e}")))?;
        decode(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
