//! Structured email extraction on top of a chat-completion provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::analysis::RawAnalysis;

use super::{CompletionRequest, EmailAnalyzer, LlmProvider, Message, ProviderError};

const EXTRACTION_TEMPERATURE: f64 = 0.2;
const EXTRACTION_MAX_TOKENS: u32 = 800;

const SYSTEM_PROMPT: &str = "You extract structured information from emails. \
Reply with strict JSON only, using exactly these keys: \
summary_lines (an array of exactly 5 strings), \
category (one of: Academic, HR, Finance, IT, General), \
urgency (one of: Critical, High, Normal), \
action_required (one of: Yes, No).";

const USER_INSTRUCTIONS: &str = "Instructions:\n\
- Summarize the email as exactly 5 concise points, one sentence each, without bullet characters.\n\
- Classify the category as Academic, HR, Finance, IT, or General.\n\
- Set urgency to Critical, High, or Normal.\n\
- Set action_required to Yes if the reader is explicitly asked to do something, otherwise No.\n\
Output the JSON object only, with no surrounding text.";

/// Build the extraction request sent to a model for one email.
pub fn build_extraction_request(email_text: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message::user(format!(
            "Email:\n\n{email_text}\n\n{USER_INSTRUCTIONS}"
        ))],
        system: Some(SYSTEM_PROMPT.to_owned()),
        max_tokens: Some(EXTRACTION_MAX_TOKENS),
        temperature: Some(EXTRACTION_TEMPERATURE),
    }
}

/// Parse a model reply into a JSON object.
///
/// A surrounding Markdown code fence is removed first. If the remainder is
/// not valid JSON, the text between the first `{` and the last `}` is tried.
///
/// # Errors
///
/// Returns `ProviderError::Parse` when no JSON object can be recovered.
pub fn parse_model_json(content: &str) -> Result<Value, ProviderError> {
    let unfenced = strip_code_fence(content);

    let value = match serde_json::from_str::<Value>(unfenced) {
        Ok(value) => value,
        Err(strict_err) => {
            let start = unfenced.find('{');
            let end = unfenced.rfind('}');
            match (start, end) {
                (Some(start), Some(end)) if end > start => {
                    serde_json::from_str::<Value>(&unfenced[start..=end])
                        .map_err(|e| ProviderError::Parse(e.to_string()))?
                }
                _ => return Err(ProviderError::Parse(strict_err.to_string())),
            }
        }
    };

    if !value.is_object() {
        return Err(ProviderError::Parse(
            "model reply is not a JSON object".to_owned(),
        ));
    }
    Ok(value)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return content;
    }
    // Drop the opening fence line (which may carry a language tag).
    let body = trimmed.split_once('\n').map_or(trimmed, |(_, rest)| rest);
    let body_trimmed = body.trim();
    body_trimmed.strip_suffix("```").map_or(body, str::trim)
}

/// [`EmailAnalyzer`] that asks a chat model for the structured record.
#[derive(Clone)]
pub struct ModelAnalyzer {
    provider: Arc<dyn LlmProvider>,
}

impl ModelAnalyzer {
    /// Wrap a chat-completion provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

impl std::fmt::Debug for ModelAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAnalyzer")
            .field("model", &self.provider.model_id())
            .finish()
    }
}

#[async_trait]
impl EmailAnalyzer for ModelAnalyzer {
    async fn analyze(&self, email_text: &str) -> Result<RawAnalysis, ProviderError> {
        let response = self
            .provider
            .complete(build_extraction_request(email_text))
            .await?;

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model extraction reply received"
        );

        if response.text.trim().is_empty() {
            return Err(ProviderError::Parse("empty completion".to_owned()));
        }
        let value = parse_model_json(&response.text)?;
        Ok(RawAnalysis::from_value(value))
    }

    fn name(&self) -> &str {
        self.provider.model_id()
    }
}
