use std::fmt;

use anyhow::{bail, Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Same as axum's built-in default, made explicit so long CVs can be allowed.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Deadline for a single outbound generateContent call.
    pub llm_timeout_secs: u64,
    /// Number of questions returned by the question generator.
    pub question_count: usize,
    /// Request body cap; larger bodies get 413.
    pub max_body_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let question_count = optional_env("QUESTION_COUNT", "3")
            .parse::<usize>()
            .context("QUESTION_COUNT must be a positive integer")?;
        if question_count == 0 {
            bail!("QUESTION_COUNT must be at least 1");
        }

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: optional_env("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            question_count,
            max_body_bytes: optional_env("MAX_BODY_BYTES", &DEFAULT_MAX_BODY_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_BODY_BYTES must be a number of bytes")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

// The API key must never end up in logs, so Debug is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("question_count", &self.question_count)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        llm_timeout_secs: 5,
        question_count: 3,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_redacts_api_key() {
        let mut config = test_config();
        config.gemini_api_key = "AIza-super-secret".to_string();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("AIza-super-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains(DEFAULT_GEMINI_MODEL));
    }

    #[test]
    fn test_optional_env_falls_back_to_default() {
        let value = optional_env("INTERVIEW_API_TEST_SURELY_UNSET_VAR", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_require_env_reports_missing_key() {
        let err = require_env("INTERVIEW_API_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert!(err
            .to_string()
            .contains("INTERVIEW_API_TEST_SURELY_UNSET_VAR"));
    }
}
