use crate::adapters::gemini::DEFAULT_ENDPOINT;
use crate::core::engine::DEFAULT_MAX_CARDS;
use crate::core::ConfigProvider;
use crate::domain::model::{MAX_POOL_ITEMS, MIN_POOL_ITEMS};
use crate::utils::error::{BingoError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_CATALOG: &str = "data/bingo_topics.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub upstream: UpstreamConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CATALOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub retry_on_transient: bool,
    pub item_count: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry_on_transient: true,
            item_count: MAX_POOL_ITEMS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_cards: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_cards: DEFAULT_MAX_CARDS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BingoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BingoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BingoError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn catalog_path(&self) -> &str {
        &self.catalog.path
    }

    fn upstream_endpoint(&self) -> &str {
        &self.upstream.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 或空字串視為沒有設定
        self.upstream
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    fn retry_on_transient(&self) -> bool {
        self.upstream.retry_on_transient
    }

    fn item_count(&self) -> usize {
        self.upstream.item_count
    }

    fn max_cards(&self) -> usize {
        self.limits.max_cards
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        tracing::debug!("✅ TOML configuration validation passed");
        Ok(())
    }
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_socket_addr("server.bind", config.bind_address())?;
    validation::validate_path("catalog.path", config.catalog_path())?;
    validation::validate_url("upstream.endpoint", config.upstream_endpoint())?;
    validation::validate_range(
        "upstream.timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        120,
    )?;
    validation::validate_range(
        "upstream.item_count",
        config.item_count(),
        MIN_POOL_ITEMS,
        MAX_POOL_ITEMS,
    )?;
    validation::validate_range("limits.max_cards", config.max_cards(), 1, 1000)?;
    Ok(())
}
