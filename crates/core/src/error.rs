use thiserror::Error;

pub type InsightsResult<T> = Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data load failed: {0}")]
    DataLoad(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl InsightsError {
    /// Message shown to the user in place of a view's title banner.
    ///
    /// Every failure while obtaining the dataset collapses into the single
    /// "data load failed" category, so the banner carries only the inner
    /// human-readable text.
    pub fn user_message(&self) -> String {
        match self {
            InsightsError::DataLoad(msg) | InsightsError::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for InsightsError {
    fn from(err: config::ConfigError) -> Self {
        InsightsError::Config(err.to_string())
    }
}
