//! Local JSON file source.

use crate::{decode, DataSource};
use async_trait::async_trait;
use insights_core::{InsightsError, InsightsResult, MarketingData};
use std::path::PathBuf;
use tracing::debug;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> InsightsResult<MarketingData> {
        debug!(path = %self.path.display(), "Reading marketing data file");
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            InsightsError::DataLoad(format!("Cannot read {}: {e}", self.path.display()))
        })?;
        decode(&body)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
