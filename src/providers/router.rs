//! Provider selection from explicit configuration and loaded credentials.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::config::ModelOverrides;
use crate::credentials::Credentials;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::LlmProvider;

/// Provider selection errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The provider name is not recognised.
    #[error("unsupported provider '{name}', expected openai, anthropic, mistral or none")]
    UnknownProvider {
        /// Unrecognised name.
        name: String,
    },
    /// Required API credential missing for the selected provider.
    #[error("missing credential for provider '{provider}': {key}")]
    MissingCredential {
        /// Provider name.
        provider: String,
        /// Missing credential key.
        key: String,
    },
}

/// A concrete model vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI chat completions.
    OpenAi,
    /// Anthropic messages.
    Anthropic,
    /// Mistral chat completions.
    Mistral,
}

impl ProviderKind {
    /// Auto-detection order.
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Mistral];

    /// Short name used in model specs and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Mistral => "mistral",
        }
    }

    /// Credential key holding the API key.
    pub fn credential_key(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Mistral => "MISTRAL_API_KEY",
        }
    }

    /// Model used when no override is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-sonnet-20240620",
            Self::Mistral => "open-mixtral-8x7b",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which provider the user asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Pick the first vendor with a configured API key.
    #[default]
    Auto,
    /// Never call a model; always use the heuristics.
    Disabled,
    /// A specific vendor.
    Explicit(ProviderKind),
}

impl FromStr for ProviderChoice {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "none" | "heuristic" | "heuristics" => Ok(Self::Disabled),
            "openai" | "gpt" | "gpt-4o" => Ok(Self::Explicit(ProviderKind::OpenAi)),
            "anthropic" | "claude" => Ok(Self::Explicit(ProviderKind::Anthropic)),
            "mistral" | "mixtral" => Ok(Self::Explicit(ProviderKind::Mistral)),
            _ => Err(SelectionError::UnknownProvider { name: s.to_owned() }),
        }
    }
}

/// Resolve the provider to use, if any.
///
/// `Auto` returns `Ok(None)` when no vendor has credentials. An explicit
/// vendor without its API key is an error the caller is expected to log and
/// answer with the heuristics.
///
/// # Errors
///
/// Returns [`SelectionError::MissingCredential`] for an explicit vendor whose
/// API key is absent.
pub fn select_provider(
    choice: ProviderChoice,
    models: &ModelOverrides,
    credentials: &Credentials,
) -> Result<Option<Arc<dyn LlmProvider>>, SelectionError> {
    let kind = match choice {
        ProviderChoice::Disabled => return Ok(None),
        ProviderChoice::Explicit(kind) => kind,
        ProviderChoice::Auto => {
            match ProviderKind::ALL
                .into_iter()
                .find(|kind| credentials.has(kind.credential_key()))
            {
                Some(kind) => kind,
                None => return Ok(None),
            }
        }
    };

    let model = models.for_kind(kind).unwrap_or(kind.default_model());
    let provider = instantiate_provider(kind, model, credentials)?;
    info!(provider = %provider.model_id(), "model provider selected");
    Ok(Some(provider))
}

fn instantiate_provider(
    kind: ProviderKind,
    model: &str,
    credentials: &Credentials,
) -> Result<Arc<dyn LlmProvider>, SelectionError> {
    let key = kind.credential_key();
    let api_key = credentials
        .get(key)
        .ok_or_else(|| SelectionError::MissingCredential {
            provider: kind.name().to_owned(),
            key: key.to_owned(),
        })?
        .to_owned();
    let model_spec = format!("{kind}/{model}");
    let model_name = model.to_owned();

    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(model_spec, model_name, api_key)),
        ProviderKind::Anthropic => {
            Arc::new(AnthropicProvider::new(model_spec, model_name, api_key))
        }
        ProviderKind::Mistral => {
            Arc::new(OpenAiProvider::mistral(model_spec, model_name, api_key))
        }
    };
    Ok(provider)
}
