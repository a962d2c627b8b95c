//! Mock generation adapter for testing without API calls.
//!
//! Replies are scripted as raw model text, so the same parsing rules as the
//! real adapters apply. Every prompt received is recorded.

use super::response::parse_review_payload;
use crate::domain::{DomainError, GenerationPrompt, GenerationResult};
use crate::ports::GenerationPort;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// What the mock answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Raw model output, parsed like a real provider reply.
    Text(String),
    /// Simulated transport failure.
    TransportError(String),
}

impl MockReply {
    /// Well-formed `{"reviewText": ...}` reply.
    pub fn review(text: &str) -> Self {
        Self::Text(serde_json::json!({ "reviewText": text }).to_string())
    }
}

/// Mock adapter for tests and offline demos.
pub struct MockGenerationAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    configured: bool,
    /// Consumed front to back; `fallback` answers once empty.
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    prompts: Mutex<Vec<GenerationPrompt>>,
}

impl MockGenerationAdapter {
    /// Create a new mock adapter with default delay (100ms) and a canned review.
    pub fn new() -> Self {
        Self {
            delay_ms: 100,
            configured: true,
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::review(
                "[MOCK] What a lovely experience! Friendly staff, great quality, \
                 and I will definitely be back. Set GEMINI_API_KEY for real reviews.",
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `reply`.
    pub fn replying(reply: MockReply) -> Self {
        Self {
            delay_ms: 0,
            fallback: reply,
            ..Self::new()
        }
    }

    /// Behave as if no credential were configured.
    pub fn unconfigured() -> Self {
        Self {
            delay_ms: 0,
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Queue replies to use before the fallback.
    pub fn with_script(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(replies);
        self
    }

    /// Number of `generate` calls that reached the (simulated) network.
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<GenerationPrompt> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockGenerationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationPort for MockGenerationAdapter {
    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::Configuration(
                "The GEMINI_API_KEY is not set. Please add it to your .env file.".to_string(),
            ))
        }
    }

    async fn generate(&self, prompt: &GenerationPrompt) -> Result<GenerationResult, DomainError> {
        self.ensure_configured()?;
        info!(
            prompt_len = prompt.text.len(),
            temperature = ?prompt.params.temperature,
            "[MOCK] Simulating review generation"
        );

        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.clone());

        // Simulate network delay
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match self.next_reply() {
            MockReply::Text(raw) => parse_review_payload(&raw),
            MockReply::TransportError(msg) => {
                Err(DomainError::Provider(format!("HTTP request failed: {}", msg)))
            }
        }
    }
}
