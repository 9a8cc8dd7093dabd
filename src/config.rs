//! Configuration loading.
//!
//! Loads `mailtriage.toml` (or `$MAILTRIAGE_CONFIG_PATH`, or the per-user
//! config directory). Environment variables override file values; file
//! values override defaults. Command-line flags are applied last by the
//! binary.
//!
//! Precedence: CLI flags > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::providers::router::ProviderKind;

/// Default config file name in the working directory.
pub const CONFIG_FILE_NAME: &str = "mailtriage.toml";

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model provider selection.
    pub provider: ProviderConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Optional row sink.
    pub sink: SinkConfig,
}

impl AppConfig {
    /// Load configuration from a file, then apply process env overrides.
    ///
    /// An explicit `path` must exist. Without one, the default locations are
    /// searched and a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML only, no env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// explicit path does not exist.
    pub fn load_file(path: Option<&Path>) -> Result<Self> {
        if let Some(explicit) = path {
            let contents = std::fs::read_to_string(explicit)
                .with_context(|| format!("failed to read config at {}", explicit.display()))?;
            tracing::info!(path = %explicit.display(), "loading config from file");
            return Self::from_toml(&contents)
                .with_context(|| format!("invalid config at {}", explicit.display()));
        }

        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("invalid config at {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config file {}: {e}",
                path.display()
            )),
        }
    }

    /// Resolve the config file path using a custom env resolver.
    ///
    /// Checks `$MAILTRIAGE_CONFIG_PATH`, then `./mailtriage.toml`, then the
    /// per-user config directory. Falls back to `./mailtriage.toml` when
    /// nothing exists.
    pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("MAILTRIAGE_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        user_config_path()
            .filter(|path| path.exists())
            .unwrap_or(local)
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("PROVIDER") {
            self.provider.name = v;
        }
        if let Some(v) = env("OPENAI_MODEL") {
            self.provider.models.openai = Some(v);
        }
        if let Some(v) = env("ANTHROPIC_MODEL") {
            self.provider.models.anthropic = Some(v);
        }
        if let Some(v) = env("MISTRAL_MODEL") {
            self.provider.models.mistral = Some(v);
        }
        if let Some(v) = env("MAILTRIAGE_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.provider.request_timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "MAILTRIAGE_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("MAILTRIAGE_LOG") {
            self.logging.level = v;
        }
        if let Some(v) = env("MAILTRIAGE_SINK_PATH") {
            self.sink.jsonl_path = Some(PathBuf::from(v));
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has wrong value types.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mailtriage")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

// ── Provider config ─────────────────────────────────────────────

/// Model provider selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// `openai`, `anthropic`, `mistral`, `none`, or empty for auto-detect.
    pub name: String,
    /// Dotenv file holding API keys.
    pub credentials_path: PathBuf,
    /// Per-call timeout for provider requests; `0` disables it.
    pub request_timeout_secs: u64,
    /// Per-vendor model overrides.
    pub models: ModelOverrides,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            credentials_path: PathBuf::from(".env"),
            request_timeout_secs: 60,
            models: ModelOverrides::default(),
        }
    }
}

/// Per-vendor model names overriding the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelOverrides {
    /// OpenAI model.
    pub openai: Option<String>,
    /// Anthropic model.
    pub anthropic: Option<String>,
    /// Mistral model.
    pub mistral: Option<String>,
}

impl ModelOverrides {
    /// Configured model for a vendor, if any.
    pub fn for_kind(&self, kind: ProviderKind) -> Option<&str> {
        let model = match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Mistral => &self.mistral,
        };
        model.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Use one model name whichever vendor ends up selected.
    pub fn set_all(&mut self, model: &str) {
        self.openai = Some(model.to_owned());
        self.anthropic = Some(model.to_owned());
        self.mistral = Some(model.to_owned());
    }
}

// ── Logging config ──────────────────────────────────────────────

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}

// ── Sink config ─────────────────────────────────────────────────

/// Row sink settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Append one JSON line per analysis to this file.
    pub jsonl_path: Option<PathBuf>,
}

// ── Tests ───────────────────────────────────────────────────────
