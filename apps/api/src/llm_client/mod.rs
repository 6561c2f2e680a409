//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Handlers depend on the `TextGenerator` trait; `GeminiClient` is the production backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[cfg(test)]
pub mod testing;

const RESPONSE_MIME_TYPE: &str = "application/json";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {status} {status_text} - {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Gemini API request timed out after {0}s")]
    Timeout(u64),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The envelope has no `candidates[0].content.parts[0].text`.
    #[error("Unexpected API response format")]
    UnexpectedFormat { raw: String },

    /// The embedded text is not JSON of the requested shape.
    #[error("Model output did not match the requested schema: {source}")]
    Decode {
        source: serde_json::Error,
        raw: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

impl<'a> GenerateContentRequest<'a> {
    /// Single-turn user prompt with schema-constrained JSON output.
    pub fn new(prompt: &'a str, response_schema: &'a Value) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
                response_schema,
            },
        }
    }
}

/// Typed view over the generateContent envelope. Every level is optional so a
/// malformed envelope decodes and is rejected by `first_text` instead.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first part.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait seam
// ────────────────────────────────────────────────────────────────────────────

/// A remote text-generation backend.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so handlers can be
/// exercised against a fake without any network access.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one schema-constrained generation request and returns the raw
    /// response envelope.
    async fn generate(&self, prompt: &str, response_schema: &Value) -> Result<Value, LlmError>;
}

/// Calls the generator and decodes the embedded JSON text as `T` in one step.
pub async fn generate_json<T: DeserializeOwned>(
    llm: &dyn TextGenerator,
    prompt: &str,
    response_schema: &Value,
) -> Result<T, LlmError> {
    let envelope = llm.generate(prompt, response_schema).await?;
    decode_envelope(&envelope)
}

/// Unwraps `candidates[0].content.parts[0].text` and parses it as `T`.
pub fn decode_envelope<T: DeserializeOwned>(envelope: &Value) -> Result<T, LlmError> {
    let parsed = GenerateContentResponse::deserialize(envelope).unwrap_or_default();
    let text = parsed.first_text().ok_or_else(|| LlmError::UnexpectedFormat {
        raw: envelope.to_string(),
    })?;

    serde_json::from_str(strip_json_fences(text)).map_err(|source| LlmError::Decode {
        source,
        raw: text.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini backend
// ────────────────────────────────────────────────────────────────────────────

/// Production `TextGenerator` backed by the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let model = model.into();
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint_url(base_url, &model),
            model,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            config.gemini_model.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, body: &GenerateContentRequest<'_>) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let text = response.text().await.map_err(redact_url)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// reqwest errors print the request URL, which carries the API key.
fn redact_url(err: reqwest::Error) -> LlmError {
    LlmError::Http(err.without_url())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, response_schema: &Value) -> Result<Value, LlmError> {
        let body = GenerateContentRequest::new(prompt, response_schema);

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending generateContent request"
        );

        tokio::time::timeout(self.timeout, self.send(&body))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))?
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_json_fences(input), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_body_uses_gemini_field_names() {
        let schema = json!({"type": "ARRAY", "items": {"type": "STRING"}});
        let body = serde_json::to_value(GenerateContentRequest::new("hello", &schema)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_endpoint_url_does_not_embed_key() {
        let url = endpoint_url("https://generativelanguage.googleapis.com/", "gemini-x");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-x:generateContent"
        );
        assert!(!url.contains("key="));
    }

    #[test]
    fn test_decode_envelope_extracts_first_part() {
        let envelope = json!({
            "candidates": [
                {"content": {"parts": [{"text": "[\"Q1\",\"Q2\",\"Q3\"]"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "[\"other\"]"}]}}
            ]
        });
        let questions: Vec<String> = decode_envelope(&envelope).unwrap();
        assert_eq!(questions, vec!["Q1", "Q2", "Q3"]);
    }

    #[test]
    fn test_decode_envelope_missing_candidates_is_unexpected_format() {
        let envelope = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = decode_envelope::<Vec<String>>(&envelope).unwrap_err();
        match err {
            LlmError::UnexpectedFormat { raw } => assert!(raw.contains("SAFETY")),
            other => panic!("expected UnexpectedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_envelope_empty_parts_is_unexpected_format() {
        let envelope = json!({"candidates": [{"content": {"parts": []}}]});
        assert!(matches!(
            decode_envelope::<Vec<String>>(&envelope),
            Err(LlmError::UnexpectedFormat { .. })
        ));
    }

    #[test]
    fn test_decode_envelope_wrong_shape_is_unexpected_format() {
        let envelope = json!({"candidates": "not-a-list"});
        assert!(matches!(
            decode_envelope::<Vec<String>>(&envelope),
            Err(LlmError::UnexpectedFormat { .. })
        ));
    }

    #[test]
    fn test_decode_envelope_malformed_text_is_decode_error() {
        let envelope = json!({"candidates": [{"content": {"parts": [{"text": "[\"Q1\","}]}}]});
        match decode_envelope::<Vec<String>>(&envelope).unwrap_err() {
            LlmError::Decode { raw, .. } => assert_eq!(raw, "[\"Q1\","),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_message_carries_status_and_body() {
        let err = LlmError::Api {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: "overloaded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gemini API error: 503 Service Unavailable - overloaded"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_http_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = GeminiClient::new(
            "test-key",
            "http://127.0.0.1:9",
            "gemini-test",
            Duration::from_secs(5),
        )
        .unwrap();
        let schema = json!({"type": "STRING"});
        let err = client.generate("hi", &schema).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_) | LlmError::Timeout(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
