//! Google Gemini adapter (Generative Language API).
//!
//! Uses structured output: the expected schema travels in `generationConfig`,
//! so the model answers with bare JSON.

use super::response::{ensure_success, excerpt, parse_review_payload};
use crate::domain::{DomainError, GenerationPrompt, GenerationResult, OutputSchema};
use crate::ports::GenerationPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Gemini `generateContent` client.
pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://generativelanguage.googleapis.com")
    /// * `api_key` - `None` makes every call fail with a configuration error
    /// * `model` - Model name (e.g., "gemini-2.0-flash")
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Gemini's OpenAPI-subset schema (uppercase type names).
    fn response_schema(schema: &OutputSchema) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = schema
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.to_string(),
                    serde_json::json!({ "type": "STRING", "description": f.description }),
                )
            })
            .collect();
        let required: Vec<&str> = schema
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        serde_json::json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        })
    }

    fn build_request(prompt: &GenerationPrompt) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.text.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: prompt.params.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: Self::response_schema(&prompt.schema),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

/// Candidates from a `generateContent` body.
///
/// A body with neither `candidates` nor `promptFeedback` is not a Gemini reply
/// (e.g. a proxy error object) and counts as malformed.
fn candidates_from_body(raw_body: &str) -> Result<Vec<GeminiCandidate>, DomainError> {
    let body: GeminiResponse = serde_json::from_str(raw_body).map_err(|e| {
        DomainError::Provider(format!(
            "Failed to parse API response: {}: {}",
            e,
            excerpt(raw_body)
        ))
    })?;
    match (body.candidates, body.prompt_feedback) {
        (Some(candidates), _) => Ok(candidates),
        (None, Some(feedback)) => {
            warn!(feedback = %feedback, "Gemini returned no candidates");
            Ok(Vec::new())
        }
        (None, None) => Err(DomainError::Provider(format!(
            "Unexpected API response: {}",
            excerpt(raw_body)
        ))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait::async_trait]
impl GenerationPort for GeminiAdapter {
    fn ensure_configured(&self) -> Result<(), DomainError> {
        match &self.api_key {
            Some(_) => Ok(()),
            None => Err(DomainError::Configuration(
                "The GEMINI_API_KEY is not set. Please add it to your .env file.".to_string(),
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
            "sending prompt to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request(prompt))
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("HTTP request failed: {}", e)))?;

        let response = ensure_success(response).await?;

        let raw_body = response
            .text()
            .await
            .map_err(|e| DomainError::Provider(format!("Failed to read API response: {}", e)))?;

        let Some(candidate) = candidates_from_body(&raw_body)?.into_iter().next() else {
            return Err(DomainError::EmptyResult);
        };
        let raw_content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        debug!(
            raw_len = raw_content.len(),
            finish_reason = ?candidate.finish_reason,
            "received Gemini response"
        );

        if raw_content.trim().is_empty() {
            return Err(DomainError::EmptyResult);
        }

        let result = parse_review_payload(&raw_content)?;
        info!(review_len = result.review_text.len(), "review generated");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenerationParams;

    fn prompt(temperature: Option<f32>) -> GenerationPrompt {
        GenerationPrompt {
            text: "Write a review".to_string(),
            schema: OutputSchema::review(),
            params: GenerationParams { temperature },
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GeminiAdapter::build_request(&prompt(None))).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Write a review");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            serde_json::json!(["reviewText"])
        );
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_temperature_attached_when_set() {
        let body = serde_json::to_value(GeminiAdapter::build_request(&prompt(Some(0.95)))).unwrap();
        let t = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((t - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let adapter = GeminiAdapter::new(
            "http://localhost:9999/".into(),
            Some("k".into()),
            "gemini-2.0-flash".into(),
        );
        assert_eq!(
            adapter.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_body_must_be_gemini_envelope() {
        for raw in [r#"{"error": {"message": "quota exceeded upstream"}}"#, "[]", "{}"] {
            assert!(
                matches!(candidates_from_body(raw), Err(DomainError::Provider(_))),
                "{raw}"
            );
        }
        let blocked = candidates_from_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert!(blocked.unwrap().is_empty());
        assert!(candidates_from_body(r#"{"candidates": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let adapter = GeminiAdapter::new(
            DEFAULT_GEMINI_BASE_URL.into(),
            Some("  ".into()),
            DEFAULT_GEMINI_MODEL.into(),
        );
        assert!(matches!(
            adapter.ensure_configured(),
            Err(DomainError::Configuration(_))
        ));
    }
}
