use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::crew::Process;
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_concurrent: usize,
    pub queue_size: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: constants::llm::DEFAULT_MODEL.to_string(),
            temperature: None,
            max_concurrent: constants::llm::DEFAULT_MAX_CONCURRENT,
            queue_size: constants::llm::DEFAULT_QUEUE_SIZE,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    pub process: Process,
    pub manager_max_iter: usize,
    pub agent_max_iter: usize,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            process: Process::default(),
            manager_max_iter: constants::crew::MANAGER_MAX_ITER,
            agent_max_iter: constants::crew::AGENT_MAX_ITER,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub history_days: i64,
    pub max_table_rows: usize,
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            history_days: constants::market_data::HISTORY_DAYS,
            max_table_rows: constants::market_data::MAX_TABLE_ROWS,
            timeout_secs: constants::market_data::TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub max_results: usize,
    pub region: String,
    pub safesearch: String,
    /// Assets the news analyst always covers alongside the requested ticker
    pub always_include: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            max_results: constants::news::MAX_RESULTS,
            region: constants::news::REGION.to_string(),
            safesearch: constants::news::SAFESEARCH.to_string(),
            always_include: vec!["BTC".to_string()],
            timeout_secs: constants::news::TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: String,
    pub language: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: constants::report::OUTPUT_DIR.to_string(),
            language: constants::report::LANGUAGE.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: constants::server::BIND_ADDR.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub crew: CrewConfig,
    pub market_data: MarketDataConfig,
    pub news: NewsConfig,
    pub report: ReportConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (default `config.yaml`), then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = Self::from_file(&config_path)?;
        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Environment wins over the file for secrets and deployment settings.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Some(model) = non_empty("OPENAI_MODEL_NAME") {
            self.llm.model = model;
        }
        if let Some(addr) = non_empty("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crew.manager_max_iter == 0 || self.crew.agent_max_iter == 0 {
            return Err(ConfigError::Invalid(
                "crew iteration limits must be at least 1".to_string(),
            ));
        }
        if self.llm.max_concurrent == 0 || self.llm.queue_size == 0 {
            return Err(ConfigError::Invalid(
                "llm.max_concurrent and llm.queue_size must be at least 1".to_string(),
            ));
        }
        if self.news.max_results == 0 {
            return Err(ConfigError::Invalid(
                "news.max_results must be at least 1".to_string(),
            ));
        }
        if self.market_data.history_days <= 0
            || self.market_data.history_days > constants::market_data::MAX_HISTORY_DAYS
        {
            return Err(ConfigError::Invalid(format!(
                "market_data.history_days must be between 1 and {}",
                constants::market_data::MAX_HISTORY_DAYS
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        Ok(())
    }
}
