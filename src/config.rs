use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Completion provider settings (OpenAI-compatible chat completions)
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL, `/chat/completions` is appended
    pub api_base: String,
    /// Bearer token. Usually supplied through OPENAI_API_KEY rather than the file
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    /// Ceiling for `max_tokens`; a request's target length is capped at this value
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"****")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Command line arguments for configuration overrides
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "email-assistant")]
#[command(version, about = "Email Assistant - LLM-backed email drafting service")]
pub struct CommandLineArgs {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Server host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub server_host: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Logging level (overrides config file, e.g., "info,email_assistant=debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Provider base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    pub llm_api_base: Option<String>,

    /// Provider model identifier (overrides config file)
    #[arg(long, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// Maximum output tokens per generation (overrides config file)
    #[arg(long, value_name = "TOKENS")]
    pub llm_max_tokens: Option<u32>,
}

impl Config {
    /// Load configuration with command line, environment variable, and file support
    ///
    /// Loading order (priority from highest to lowest):
    /// 1. Command line arguments
    /// 2. Environment variables (a `.env` file in the working directory is loaded first)
    /// 3. Configuration file (config.toml)
    /// 4. Default values
    pub fn load() -> Result<Self, anyhow::Error> {
        let cli_args = CommandLineArgs::parse();
        Self::load_with(&cli_args)
    }

    pub fn load_with(cli_args: &CommandLineArgs) -> Result<Self, anyhow::Error> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!("Loaded environment from {}", path.display());
        }

        Self::load_from(cli_args, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load_with`] but reads variables through `lookup` instead of the process env
    pub fn load_from(
        cli_args: &CommandLineArgs,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let config_path = cli_args.config.clone().or_else(Self::find_config_file);
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        config.apply_env_overrides(&lookup);
        config.apply_cli_overrides(cli_args);
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OPENAI_API_KEY: Provider API key (required)
    /// - OPENAI_API_BASE: Provider base URL (default: https://api.openai.com/v1)
    /// - DATABASE_URL / APP_DATABASE_URL: Database URL (APP_ wins when both are set)
    /// - APP_SERVER_HOST, APP_SERVER_PORT
    /// - APP_LOG_LEVEL
    /// - APP_LLM_MODEL, APP_LLM_TEMPERATURE, APP_LLM_TOP_P, APP_LLM_MAX_TOKENS
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = key;
            tracing::info!("Override llm.api_key from env");
        }

        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.llm.api_base = base;
            tracing::info!("Override llm.api_base from env: {}", self.llm.api_base);
        }

        if let Some(host) = lookup("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = lookup("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Some(db_url) = lookup("DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env (DATABASE_URL)");
        }

        if let Some(db_url) = lookup("APP_DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env");
        }

        if let Some(level) = lookup("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(model) = lookup("APP_LLM_MODEL") {
            self.llm.model = model;
            tracing::info!("Override llm.model from env: {}", self.llm.model);
        }

        if let Some(temperature) = lookup("APP_LLM_TEMPERATURE") {
            match temperature.parse() {
                Ok(val) => {
                    self.llm.temperature = val;
                    tracing::info!("Override llm.temperature from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_LLM_TEMPERATURE '{}': {} (keep {})",
                    temperature,
                    e,
                    self.llm.temperature
                ),
            }
        }

        if let Some(top_p) = lookup("APP_LLM_TOP_P") {
            match top_p.parse() {
                Ok(val) => {
                    self.llm.top_p = val;
                    tracing::info!("Override llm.top_p from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_LLM_TOP_P '{}': {} (keep {})",
                    top_p,
                    e,
                    self.llm.top_p
                ),
            }
        }

        if let Some(max_tokens) = lookup("APP_LLM_MAX_TOKENS") {
            match max_tokens.parse() {
                Ok(val) => {
                    self.llm.max_tokens = val;
                    tracing::info!("Override llm.max_tokens from env: {}", val);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_LLM_MAX_TOKENS '{}': {} (keep {})",
                    max_tokens,
                    e,
                    self.llm.max_tokens
                ),
            }
        }
    }

    /// Apply command line argument overrides (highest priority)
    fn apply_cli_overrides(&mut self, args: &CommandLineArgs) {
        if let Some(host) = &args.server_host {
            self.server.host = host.clone();
            tracing::info!("Override server.host from CLI: {}", self.server.host);
        }

        if let Some(port) = args.server_port {
            self.server.port = port;
            tracing::info!("Override server.port from CLI: {}", self.server.port);
        }

        if let Some(db_url) = &args.database_url {
            self.database.url = db_url.clone();
            tracing::info!("Override database.url from CLI");
        }

        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
            tracing::info!("Override logging.level from CLI: {}", self.logging.level);
        }

        if let Some(base) = &args.llm_api_base {
            self.llm.api_base = base.clone();
            tracing::info!("Override llm.api_base from CLI: {}", self.llm.api_base);
        }

        if let Some(model) = &args.llm_model {
            self.llm.model = model.clone();
            tracing::info!("Override llm.model from CLI: {}", self.llm.model);
        }

        if let Some(max_tokens) = args.llm_max_tokens {
            self.llm.max_tokens = max_tokens;
            tracing::info!("Override llm.max_tokens from CLI: {}", self.llm.max_tokens);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        // The service is useless without a provider credential
        if self.llm.api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set (set it in the environment or a .env file)");
        }

        if self.llm.api_base.trim().is_empty() {
            anyhow::bail!("llm.api_base cannot be empty");
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!("llm.temperature must be between 0 and 2");
        }

        if self.llm.top_p <= 0.0 || self.llm.top_p > 1.0 {
            anyhow::bail!("llm.top_p must be in (0, 1]");
        }

        if self.llm.max_tokens == 0 {
            anyhow::bail!("llm.max_tokens must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite://data/email_assistant.db".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,email_assistant=debug".to_string(),
            file: Some("logs/email-assistant.log".to_string()),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/conf/config.toml");

    fn env_of(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_args() -> CommandLineArgs {
        CommandLineArgs { config: Some(SAMPLE_CONFIG.to_string()), ..Default::default() }
    }

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        config
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9100

            [llm]
            model = "gpt-4o-mini"
            max_tokens = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.database.url, "sqlite://data/email_assistant.db");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let mut config = valid_config();
        config.llm.api_key = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sampling_parameters() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.llm.temperature = 2.5;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.llm.top_p = 0.0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.llm.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = valid_config();
        let args = CommandLineArgs {
            server_port: Some(9999),
            llm_model: Some("gpt-4o".to_string()),
            llm_max_tokens: Some(64),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 64);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = valid_config();
        let rendered = format!("{:?}", config.llm);
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("****"));
    }

    #[test]
    fn test_env_overrides_provider_settings() {
        let env = env_of(&[
            ("OPENAI_API_KEY", "sk-from-env"),
            ("OPENAI_API_BASE", "http://localhost:9000/v1"),
            ("APP_LLM_MODEL", "gpt-4o-mini"),
            ("APP_LLM_TEMPERATURE", "0.2"),
            ("APP_LLM_TOP_P", "0.9"),
            ("APP_LLM_MAX_TOKENS", "256"),
            ("APP_SERVER_PORT", "9001"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).cloned());

        assert_eq!(config.llm.api_key, "sk-from-env");
        assert_eq!(config.llm.api_base, "http://localhost:9000/v1");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.top_p, 0.9);
        assert_eq!(config.llm.max_tokens, 256);
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn test_app_database_url_wins_over_database_url() {
        let env = env_of(&[
            ("DATABASE_URL", "sqlite://plain.db"),
            ("APP_DATABASE_URL", "sqlite://app.db"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).cloned());
        assert_eq!(config.database.url, "sqlite://app.db");

        let env = env_of(&[("DATABASE_URL", "sqlite://plain.db")]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).cloned());
        assert_eq!(config.database.url, "sqlite://plain.db");
    }

    #[test]
    fn test_invalid_env_numbers_keep_previous_values() {
        let env = env_of(&[
            ("APP_LLM_TEMPERATURE", "warm"),
            ("APP_LLM_TOP_P", ""),
            ("APP_LLM_MAX_TOKENS", "-1"),
            ("APP_SERVER_PORT", "not-a-port"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).cloned());

        let defaults = Config::default();
        assert_eq!(config.llm.temperature, defaults.llm.temperature);
        assert_eq!(config.llm.top_p, defaults.llm.top_p);
        assert_eq!(config.llm.max_tokens, defaults.llm.max_tokens);
        assert_eq!(config.server.port, defaults.server.port);
    }

    #[test]
    fn test_load_without_api_key_fails() {
        let err = Config::load_from(&sample_args(), |_| None).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_load_layers_file_env_and_cli() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-live"), ("APP_LLM_MODEL", "from-env")]);
        let args = CommandLineArgs { llm_model: Some("from-cli".to_string()), ..sample_args() };

        let config = Config::load_from(&args, |k| env.get(k).cloned()).unwrap();

        assert_eq!(config.llm.api_key, "sk-live");
        assert_eq!(config.llm.model, "from-cli");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.file.as_deref(), Some("logs/email-assistant.log"));
    }
}
