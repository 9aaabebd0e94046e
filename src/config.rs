//! Configuration loading.
//!
//! Loads `config.toml` (path from the CLI, `$MINDFUL_CONFIG_PATH`, or
//! `./config.toml`). Environment variables override file values; file values
//! override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classifier::KeywordLists;
use crate::prompt::SamplingParams;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "MINDFUL_CONFIG_PATH";

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings (`[server]`).
    pub server: ServerConfig,
    /// Completion provider settings (`[llm]`).
    pub llm: LlmConfig,
    /// Journal persistence settings (`[journal]`).
    pub journal: JournalConfig,
    /// Classifier phrase lists (`[keywords]`); absent lists keep defaults.
    pub keywords: KeywordLists,
    /// Log output settings (`[logging]`).
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence env vars > TOML file > defaults.
    ///
    /// An explicit `path` must exist. Without one, `$MINDFUL_CONFIG_PATH` or
    /// `./config.toml` is tried and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the result
    /// fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with a custom env resolver (avoids `set_var` in tests).
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => {
                let contents = std::fs::read_to_string(explicit).with_context(|| {
                    format!("failed to read config at {}", explicit.display())
                })?;
                tracing::info!(path = %explicit.display(), "loading config from file");
                Self::from_toml(&contents)?
            }
            None => {
                let fallback = env(CONFIG_PATH_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("config.toml"));
                Self::load_optional(&fallback)?
            }
        };
        config.apply_overrides(&env);
        config.validate()?;
        Ok(config)
    }

    fn load_optional(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            )),
        }
    }

    /// Parse a TOML string into config without env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }

    /// Apply environment variable overrides (env > config > defaults).
    fn apply_overrides(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("MINDFUL_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = env("MINDFUL_DATABASE_PATH") {
            self.journal.database_path = v;
        }
        if let Some(v) = env("MINDFUL_LOGS_DIR") {
            self.logging.logs_dir = v;
        }
        if let Some(v) = env("MINDFUL_OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = env("MINDFUL_OPENAI_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env("MINDFUL_LLM_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.llm.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "MINDFUL_LLM_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        // The key itself only ever comes from the environment named by
        // `api_key_env`, unless the file set one explicitly.
        if let Some(key) = env(&self.llm.api_key_env) {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid server.bind_addr {:?}", self.server.bind_addr))?;
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            );
        }
        if self.llm.max_tokens == 0 {
            anyhow::bail!("llm.max_tokens must be greater than zero");
        }
        Ok(())
    }
}

// ── Server config ───────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind_addr: String,
    /// Origins allowed by CORS; empty disables the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

// ── LLM config ──────────────────────────────────────────────────

/// Completion provider settings (OpenAI-compatible API).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Name of the env var holding the API key.
    pub api_key_env: String,
    /// Resolved API key.
    pub api_key: Option<String>,
    /// Upper bound on one provider call, in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature for chat turns.
    pub temperature: f32,
    /// Maximum completion tokens for chat turns.
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl LlmConfig {
    /// Provider call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Chat sampling parameters.
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

// ── Journal config ──────────────────────────────────────────────

/// Journal persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// SQLite database file.
    pub database_path: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            database_path: "data/journal.db".to_string(),
        }
    }
}

// ── Logging config ──────────────────────────────────────────────

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rotated JSON logs.
    pub logs_dir: String,
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logs_dir: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
