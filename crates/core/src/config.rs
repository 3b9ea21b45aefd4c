use crate::types::RegionMetric;
use serde::Deserialize;
use tracing::debug;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CAMPAIGN_INSIGHTS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the marketing dataset is fetched from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Filesystem path or `http(s)://` URL.
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportingConfig {
    #[serde(default)]
    pub default_region_metric: RegionMetric,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_location() -> String {
    "data/marketing.json".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Config file consulted when `CAMPAIGN_INSIGHTS_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "campaign-insights";

impl AppConfig {
    /// Load configuration from an optional config file and the environment.
    /// Environment variables win over file values.
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var("CAMPAIGN_INSIGHTS_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        debug!(file, "Loading configuration");
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source.location, "data/marketing.json");
        assert_eq!(config.source.timeout_ms, 10_000);
        assert_eq!(config.reporting.default_region_metric, RegionMetric::Revenue);
        assert!(!config.log.json);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[source]\nlocation = \"https://example.com/data.json\"\n\n[reporting]\ndefault_region_metric = \"clicks\"\n"
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.source.location, "https://example.com/data.json");
        assert_eq!(config.source.timeout_ms, 10_000);
        assert_eq!(config.reporting.default_region_metric, RegionMetric::Clicks);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("/nonexistent/insights-config").unwrap();
        assert_eq!(config.source.location, "data/marketing.json");
    }
}
