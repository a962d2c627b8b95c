//! Provider-agnostic handling of model replies.
//!
//! LLMs wrap JSON in markdown or chatter around it; everything here turns raw
//! model text into a `GenerationResult` or the matching `DomainError`.

use crate::domain::{DomainError, GenerationResult};
use tracing::warn;

/// Longest slice of an error body kept in messages and logs.
const BODY_EXCERPT_CHARS: usize = 200;

/// Sanitize JSON response from LLM.
///
/// LLMs sometimes wrap JSON in markdown code blocks. This strips them.
pub fn sanitize_json(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    // ```json ... ``` or ``` ... ```
    if let Some(fenced) = trimmed.strip_prefix("```") {
        let without_lang = match fenced.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &fenced[4..],
            _ => fenced,
        };
        if let Some(end_idx) = without_lang.rfind("```") {
            return without_lang[..end_idx].trim().to_string();
        }
        return without_lang.trim().to_string();
    }

    // Leading or trailing prose around the object
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Parse model output that should be `{"reviewText": "..."}`.
///
/// Not JSON, or not an object: `Provider` (malformed). Missing, blank or
/// non-string `reviewText`: `EmptyResult`.
pub fn parse_review_payload(raw_text: &str) -> Result<GenerationResult, DomainError> {
    let clean_json = sanitize_json(raw_text);
    let value: serde_json::Value = serde_json::from_str(&clean_json).map_err(|e| {
        warn!(error = %e, json = %excerpt(&clean_json), "model output is not JSON");
        DomainError::Provider(format!("Failed to parse model JSON: {}", e))
    })?;

    let object = value.as_object().ok_or_else(|| {
        DomainError::Provider(format!("Model output is not a JSON object: {}", excerpt(&clean_json)))
    })?;

    match object.get("reviewText").and_then(|v| v.as_str()).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(GenerationResult {
            review_text: text.to_string(),
        }),
        _ => {
            warn!(keys = ?object.keys().collect::<Vec<_>>(), "model output has no reviewText");
            Err(DomainError::EmptyResult)
        }
    }
}

/// Turn a non-success HTTP response into `DomainError::Provider`.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    warn!(status = %status, body = %excerpt(&text), "AI API returned error");
    Err(DomainError::Provider(format!(
        "API error {}: {}",
        status,
        excerpt(&text)
    )))
}

pub fn excerpt(text: &str) -> String {
    text.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"reviewText": "test"}"#;
        assert_eq!(sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = "```json\n{\"reviewText\": \"test\"}\n```";
        assert_eq!(sanitize_json(input), r#"{"reviewText": "test"}"#);
    }

    #[test]
    fn test_sanitize_json_markdown_no_lang() {
        let input = "```\n{\"reviewText\": \"test\"}\n```";
        assert_eq!(sanitize_json(input), r#"{"reviewText": "test"}"#);
    }

    #[test]
    fn test_sanitize_json_uppercase_lang_tag() {
        let input = "```JSON\n{\"reviewText\": \"test\"}\n```";
        assert_eq!(sanitize_json(input), r#"{"reviewText": "test"}"#);
        assert_eq!(parse_review_payload(input).unwrap().review_text, "test");
    }

    #[test]
    fn test_sanitize_json_with_text() {
        let input = "Here is your review:\n{\"reviewText\": \"test\"} Enjoy!";
        assert_eq!(sanitize_json(input), r#"{"reviewText": "test"}"#);
    }

    #[test]
    fn test_parse_trims_review() {
        let result = parse_review_payload(r#"{"reviewText": "  Loved it.\n"}"#).unwrap();
        assert_eq!(result.review_text, "Loved it.");
    }

    #[test]
    fn test_missing_or_blank_field_is_empty_result() {
        for raw in [r#"{}"#, r#"{"review": "x"}"#, r#"{"reviewText": "   "}"#, r#"{"reviewText": 3}"#] {
            assert!(
                matches!(parse_review_payload(raw), Err(DomainError::EmptyResult)),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_non_json_is_provider_error() {
        assert!(matches!(
            parse_review_payload("I'm sorry, I can't help with that."),
            Err(DomainError::Provider(_))
        ));
        assert!(matches!(
            parse_review_payload(r#"["reviewText"]"#),
            Err(DomainError::Provider(_))
        ));
    }
}
