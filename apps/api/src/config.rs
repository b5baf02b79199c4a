use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which generative-AI provider this instance talks to. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => bail!("LLM_PROVIDER must be 'gemini' or 'openai', got '{other}'"),
        }
    }
}

/// Credentials and model for the active provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Application configuration loaded from environment variables.
/// Startup fails if the selected provider has no API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub recordings_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let kind: ProviderKind = optional_env("LLM_PROVIDER")
            .unwrap_or_else(|| "gemini".to_string())
            .parse()?;

        let (api_key, model) = match kind {
            ProviderKind::Gemini => (
                require_env("GEMINI_API_KEY")?,
                optional_env("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            ),
            ProviderKind::OpenAi => (
                require_env("OPENAI_API_KEY")?,
                optional_env("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            ),
        };

        Ok(Config {
            provider: ProviderConfig {
                kind,
                api_key,
                model,
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            },
            recordings_dir: optional_env("RECORDINGS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("recordings")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_sessions: parse_env("MAX_SESSIONS", 1024)?,
            port: parse_env("PORT", 5000)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable only when it is set to something other than whitespace.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by router tests; never touches the process environment.
    pub fn for_tests(recordings_dir: PathBuf) -> Self {
        Config {
            provider: ProviderConfig {
                kind: ProviderKind::Gemini,
                api_key: "test-key".to_string(),
                model: "test-model".to_string(),
                timeout_secs: 5,
            },
            recordings_dir,
            max_upload_bytes: 1024 * 1024,
            max_sessions: 16,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" openai ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        let err = "anthropic".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("INTERVIEW_API_TEST_SURELY_UNSET_VAR", 5000).unwrap();
        assert_eq!(value, 5000);
    }
}
