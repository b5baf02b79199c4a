/// LLM Client — the single point of entry for all generative-AI calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through an `LlmProvider` built here.
///
/// Two providers are supported (Gemini, OpenAI). Exactly one is selected at
/// startup from `LLM_PROVIDER`; handlers only ever see `Arc<dyn LlmProvider>`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{ProviderConfig, ProviderKind};

pub mod gemini;
pub mod openai;
pub mod prompts;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("no questions could be parsed from a {chars}-char completion")]
    NoQuestions { chars: usize },
}

/// A text-completion service. Implementations make exactly one request per
/// call and never retry; failures surface to the caller immediately.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs ("gemini" | "openai").
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Sends `prompt` as a single user turn and returns the completion text.
    /// Blank completions are reported as `LlmError::EmptyContent`.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builds the configured provider. Called once from `main`.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let http = build_http_client(config.timeout_secs)?;
    let provider: Arc<dyn LlmProvider> = match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(
            http,
            config.api_key.clone(),
            config.model.clone(),
        )),
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(
            http,
            config.api_key.clone(),
            config.model.clone(),
        )),
    };
    Ok(provider)
}

fn build_http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Reads a non-2xx response into `LlmError::Api`, preferring the provider's
/// own `error.message` field over the raw body.
pub(crate) async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```lang ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains(' ') => &rest[newline + 1..],
        _ => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_language_tag() {
        let input = "```markdown\n1. What is Go?\n2. Why Rust?\n```";
        assert_eq!(strip_code_fences(input), "1. What is Go?\n2. Why Rust?");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n1. What is Go?\n```";
        assert_eq!(strip_code_fences(input), "1. What is Go?");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  1. What is Go?\n";
        assert_eq!(strip_code_fences(input), "1. What is Go?");
    }

    #[test]
    fn test_strip_code_fences_unterminated() {
        let input = "```text\n1. What is Go?";
        assert_eq!(strip_code_fences(input), "1. What is Go?");
    }

    #[test]
    fn test_build_provider_selects_configured_backend() {
        let mut config = ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: "k".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");

        config.kind = ProviderKind::Gemini;
        config.model = "gemini-1.5-flash".to_string();
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }
}
