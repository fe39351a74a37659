use crate::adapters::gemini::DEFAULT_ENDPOINT;
use crate::config::toml_config::{validate_provider, DEFAULT_BIND, DEFAULT_CATALOG};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "topic-bingo")]
#[command(about = "Bingo card generator service for predefined and custom topics")]
pub struct CliConfig {
    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    #[arg(long, default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub upstream_endpoint: String,

    #[serde(skip_serializing)]
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "20")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Do not retry the upstream call after a connect error or timeout")]
    pub no_retry: bool,

    #[arg(long, default_value = "30")]
    pub item_count: usize,

    #[arg(long, default_value = "100")]
    pub max_cards: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn catalog_path(&self) -> &str {
        &self.catalog
    }

    fn upstream_endpoint(&self) -> &str {
        &self.upstream_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn retry_on_transient(&self) -> bool {
        !self.no_retry
    }

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn max_cards(&self) -> usize {
        self.max_cards
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["topic-bingo"]).unwrap();
        assert_eq!(config.bind_address(), DEFAULT_BIND);
        assert_eq!(config.catalog_path(), DEFAULT_CATALOG);
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert!(config.retry_on_transient());
        assert!(config.config.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::try_parse_from([
            "topic-bingo",
            "--bind",
            "0.0.0.0:9000",
            "--timeout-seconds",
            "5",
            "--no-retry",
            "--max-cards",
            "8",
            "--api-key",
            "k",
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(!config.retry_on_transient());
        assert_eq!(config.max_cards(), 8);
        assert_eq!(config.api_key(), Some("k"));
    }

    #[test]
    fn test_bad_endpoint_fails_validation() {
        let config =
            CliConfig::try_parse_from(["topic-bingo", "--upstream-endpoint", "ftp://x"]).unwrap();
        assert!(config.validate().is_err());
    }
}
