use crate::analysis::OverheadModels;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Which phase a `run` invocation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[serde(alias = "analyze")]
    Analyse,
    Extract,
}

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RunMode,
    pub paths: PathsConfig,
    pub extraction: ExtractionConfig,
    pub rpc: RpcConfig,
    pub overhead: OverheadModels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Record file read by analysis and written by extraction
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// First block to scan; `None` means `latest - block_count`
    pub block_range_start: Option<u64>,
    pub block_count: u64,
}

/// JSON-RPC endpoint configuration for extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://base-rpc.publicnode.com".to_string(),
            timeout_seconds: 30,
            max_retries: 5,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Analyse,
            paths: PathsConfig {
                input_path: PathBuf::from("result.csv"),
            },
            extraction: ExtractionConfig {
                block_range_start: None,
                block_count: 1,
            },
            rpc: RpcConfig::default(),
            overhead: OverheadModels::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration using `file` (extension optional) as the optional file source
    pub fn load_from(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let file_name = file.as_ref().to_string_lossy().to_string();

        let config = Config::builder()
            .set_default("mode", "analyse")?
            .set_default(
                "paths.input_path",
                defaults.paths.input_path.to_string_lossy().to_string(),
            )?
            .set_default("extraction.block_count", defaults.extraction.block_count)?
            // RPC defaults
            .set_default("rpc.url", defaults.rpc.url)?
            .set_default("rpc.timeout_seconds", defaults.rpc.timeout_seconds)?
            .set_default("rpc.max_retries", defaults.rpc.max_retries as i64)?
            .set_default("rpc.initial_backoff_ms", defaults.rpc.initial_backoff_ms)?
            .set_default("rpc.backoff_multiplier", defaults.rpc.backoff_multiplier)?
            .set_default("rpc.max_backoff_seconds", defaults.rpc.max_backoff_seconds)?
            // Overhead model constants
            .set_default(
                "overhead.framing_divisor",
                defaults.overhead.framing_divisor,
            )?
            .set_default(
                "overhead.framing_constant",
                defaults.overhead.framing_constant,
            )?
            .set_default(
                "overhead.percentage_rate",
                defaults.overhead.percentage_rate,
            )?
            .set_default("overhead.margin_rate", defaults.overhead.margin_rate)?
            .set_default(
                "overhead.diagnostic_rate",
                defaults.overhead.diagnostic_rate,
            )?
            // Load from config.toml if it exists
            .add_source(File::with_name(&file_name).required(false))
            // OVERHEAD_PATHS__INPUT_PATH, OVERHEAD_RPC__URL, OVERHEAD_MODE, ...
            .add_source(
                Environment::with_prefix("OVERHEAD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short names for the two settings changed most often
        if let Ok(path) = env::var("RECORDS_PATH") {
            app_config.paths.input_path = PathBuf::from(path);
        }

        if let Ok(url) = env::var("RPC_URL") {
            app_config.rpc.url = url;
        }

        app_config.validate()?;

        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.overhead.framing_divisor <= 0 {
            return Err(ConfigError::Message(
                "overhead.framing_divisor must be greater than 0".to_string(),
            ));
        }
        for (name, rate) in [
            ("percentage_rate", self.overhead.percentage_rate),
            ("margin_rate", self.overhead.margin_rate),
            ("diagnostic_rate", self.overhead.diagnostic_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::Message(format!(
                    "overhead.{} must be a finite, non-negative number, got {}",
                    name, rate
                )));
            }
        }
        if self.extraction.block_count == 0 {
            return Err(ConfigError::Message(
                "extraction.block_count must be greater than 0".to_string(),
            ));
        }
        if !self.rpc.url.starts_with("http") {
            return Err(ConfigError::Message(format!(
                "rpc.url must be an http(s) URL, got '{}'",
                self.rpc.url
            )));
        }
        Ok(())
    }
}
