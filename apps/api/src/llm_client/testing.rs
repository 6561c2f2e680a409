//! In-process `TextGenerator` fake for handler and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{LlmError, TextGenerator};

#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Returned verbatim as the response envelope.
    Envelope(Value),
    /// Wraps the given text as `candidates[0].content.parts[0].text`.
    Text(String),
    /// Non-success HTTP status from the remote API.
    Status(u16, &'static str),
    Timeout,
}

pub struct FakeGenerator {
    reply: FakeReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_schema: Mutex<Option<Value>>,
}

impl FakeGenerator {
    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_schema: Mutex::new(None),
        }
    }

    pub fn replying_text(text: impl Into<String>) -> Self {
        Self::new(FakeReply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_schema(&self) -> Option<Value> {
        self.last_schema.lock().unwrap().clone()
    }
}

pub fn envelope_with_text(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }
        ]
    })
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, response_schema: &Value) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_schema.lock().unwrap() = Some(response_schema.clone());

        match &self.reply {
            FakeReply::Envelope(envelope) => Ok(envelope.clone()),
            FakeReply::Text(text) => Ok(envelope_with_text(text)),
            FakeReply::Status(status, status_text) => Err(LlmError::Api {
                status: *status,
                status_text: status_text.to_string(),
                body: "{\"error\":{\"message\":\"upstream failure\"}}".to_string(),
            }),
            FakeReply::Timeout => Err(LlmError::Timeout(5)),
        }
    }
}
