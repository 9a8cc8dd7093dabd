//! Provider API keys loaded from the process environment and a `.env` file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

/// Environment keys holding provider API keys.
pub const KNOWN_KEYS: [&str; 3] = ["OPENAI_API_KEY", "ANTHROPIC_API_KEY", "MISTRAL_API_KEY"];

/// Loaded provider credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a non-blank credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Whether a non-blank value exists for the key.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Load credentials from the process environment, then the dotenv file.
///
/// # Errors
///
/// Returns an error if the dotenv file exists but cannot be parsed.
pub fn load_credentials(env_file: &Path) -> anyhow::Result<Credentials> {
    load_credentials_with(env_file, |key| std::env::var(key).ok())
}

/// Load credentials using a custom environment resolver.
///
/// Process environment values win over the dotenv file, matching the usual
/// dotenv convention of never overriding variables already set. A missing
/// dotenv file is not an error.
///
/// # Errors
///
/// Returns an error if the dotenv file exists but cannot be read or parsed.
pub fn load_credentials_with(
    env_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Credentials> {
    let mut vars = BTreeMap::new();
    for key in KNOWN_KEYS {
        if let Some(value) = env(key).filter(|v| !v.trim().is_empty()) {
            vars.insert(key.to_owned(), value);
        }
    }

    if !env_file.exists() {
        debug!(path = %env_file.display(), "no dotenv file found");
        return Ok(Credentials { vars });
    }

    let iter = dotenvy::from_path_iter(env_file)
        .with_context(|| format!("failed to read dotenv file {}", env_file.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in dotenv file {}",
                env_file.display()
            )
        })?;
        vars.entry(key).or_insert(value);
    }
    debug!(path = %env_file.display(), keys = vars.len(), "credentials loaded");

    Ok(Credentials { vars })
}
