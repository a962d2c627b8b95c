//! OpenAI-compatible adapter for review generation.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! The output schema is described in the system message and enforced with
//! `response_format = json_object`.

use super::response::{ensure_success, parse_review_payload};
use crate::domain::{DomainError, GenerationPrompt, GenerationResult, OutputSchema};
use crate::ports::GenerationPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible review generator.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key; `None` makes every call fail with a configuration error
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
        }
    }

    /// System message describing the JSON the model must return.
    fn system_prompt(schema: &OutputSchema) -> String {
        format!(
            "You MUST respond with valid JSON only. No markdown, no explanations outside JSON.\n\
             The JSON must match this schema:\n{}",
            schema.to_json_schema()
        )
    }

    fn build_request(&self, prompt: &GenerationPrompt) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt(&prompt.schema),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.text.clone(),
                },
            ],
            temperature: prompt.params.temperature,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl GenerationPort for OpenAiAdapter {
    fn ensure_configured(&self) -> Result<(), DomainError> {
        match &self.api_key {
            Some(_) => Ok(()),
            None => Err(DomainError::Configuration(
                "The OPENAI_API_KEY is not set. Please add it to your .env file.".to_string(),
            )),
        }
    }

    async fn generate(&self, prompt: &GenerationPrompt) -> Result<GenerationResult, DomainError> {
        self.ensure_configured()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        info!(
            model = %self.model,
            prompt_len = prompt.text.len(),
            temperature = ?prompt.params.temperature,
            "sending prompt to OpenAI-compatible API"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("HTTP request failed: {}", e)))?;

        let response = ensure_success(response).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Provider(format!("Failed to parse API response: {}", e)))?;

        let raw_content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(DomainError::EmptyResult)?;

        debug!(raw_len = raw_content.len(), "received AI response");

        let result = parse_review_payload(&raw_content)?;
        info!(review_len = result.review_text.len(), "review generated");
        Ok(result)
    }
}
