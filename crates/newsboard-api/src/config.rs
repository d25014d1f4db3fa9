use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, File, FileFormat};
use config::builder::DefaultState;
use newsboard_types::{BoardConfig, EditionConfig, SummaryConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub board: BoardConfig,
    pub edition: EditionConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub summary_queue: SummaryQueueConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub mongodb_uri: Option<String>,
    #[serde(skip)]
    pub google_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Mounts `/create-posts` and `/create-news`
    pub enable_seed_routes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            enable_seed_routes: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `mongodb`
    pub backend: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database: "newsboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Requested summary length in characters
    pub summary_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: newsboard_llm::config::DEFAULT_GEMINI_MODEL.to_string(),
            base_url: newsboard_llm::config::GEMINI_API_BASE.to_string(),
            timeout_secs: 30,
            summary_chars: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryQueueConfig {
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for SummaryQueueConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment prefix → config section
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("SERVER_", "server"),
    ("CORS_", "cors"),
    ("BOARD_", "board"),
    ("EDITION_", "edition"),
    ("STORAGE_", "storage"),
    ("LLM_", "llm"),
    ("SUMMARY_", "summary_queue"),
    ("LOG_", "logging"),
];

/// Keys given as comma-separated lists in the environment
const LIST_KEYS: &[&str] = &["cors.origins", "edition.titles"];

#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Scalar(String),
    List(Vec<String>),
}

/// Map `SECTION_FIELD=value` variables onto `section.field` keys
pub fn env_overrides<I>(vars: I) -> Vec<(String, EnvValue)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut overrides = Vec::new();

    for (name, value) in vars {
        let Some((prefix, section)) = ENV_SECTIONS
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
        else {
            continue;
        };

        let field = name[prefix.len()..].to_ascii_lowercase();
        if field.is_empty() {
            continue;
        }
        let key = format!("{}.{}", section, field);

        let value = if LIST_KEYS.contains(&key.as_str()) {
            EnvValue::List(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        } else {
            EnvValue::Scalar(value)
        };
        overrides.push((key, value));
    }

    overrides
}

fn apply_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    overrides: Vec<(String, EnvValue)>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (key, value) in overrides {
        builder = match value {
            EnvValue::Scalar(value) => builder.set_override(key, value)?,
            EnvValue::List(values) => builder.set_override(key, values)?,
        };
    }
    Ok(builder)
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, BOARD_, EDITION_, STORAGE_, LLM_, SUMMARY_, LOG_)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        // 3. Environment variables override everything
        let builder = apply_overrides(builder, env_overrides(std::env::vars()))?;

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.mongodb_uri = non_empty_env("MONGODB_URI");
        cfg.google_api_key = non_empty_env("GOOGLE_API_KEY");

        if cfg.storage.backend.eq_ignore_ascii_case("mongodb") && cfg.mongodb_uri.is_none() {
            return Err(ConfigError::Message(
                "MONGODB_URI environment variable is required for the mongodb backend".to_string(),
            ));
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.post_limit < 1 {
            return Err(ConfigError::Message("board.post_limit must be at least 1".to_string()));
        }
        if self.board.subscriber_buffer < 1 {
            return Err(ConfigError::Message(
                "board.subscriber_buffer must be at least 1".to_string(),
            ));
        }
        if self.edition.threads_per_edition < 1 {
            return Err(ConfigError::Message(
                "edition.threads_per_edition must be at least 1".to_string(),
            ));
        }
        if self.edition.titles.len() < self.edition.threads_per_edition {
            return Err(ConfigError::Message(format!(
                "edition.titles has {} entries, need at least {}",
                self.edition.titles.len(),
                self.edition.threads_per_edition
            )));
        }
        Ok(())
    }

    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig::default()
            .with_target_chars(self.llm.summary_chars)
            .with_max_attempts(self.summary_queue.max_attempts)
            .with_retry_backoff(Duration::from_millis(self.summary_queue.retry_backoff_ms))
    }

    /// Gemini settings, when an API key is present
    pub fn gemini_config(&self) -> Option<newsboard_llm::GeminiConfig> {
        self.google_api_key.as_ref().map(|key| {
            newsboard_llm::GeminiConfig::new(key)
                .with_model(&self.llm.model)
                .with_base_url(&self.llm.base_url)
                .with_timeout(Duration::from_secs(self.llm.timeout_secs))
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
