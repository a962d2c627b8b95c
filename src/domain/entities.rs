//! Domain entities. Pure data structures for the review pipeline.
//!
//! No HTTP/provider types here; adapters map to and from these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire names of the submitted form fields.
pub mod fields {
    pub const BUSINESS_NAME: &str = "businessName";
    pub const PRODUCT_OR_SERVICE: &str = "productOrService";
    pub const POSITIVE_EXPERIENCE: &str = "positiveExperience";
    pub const DESTINATION_LINK: &str = "destinationLink";
    /// Older name of `destinationLink`, still accepted on input.
    pub const GOOGLE_MAPS_LINK: &str = "googleMapsLink";
}

/// Raw form submission: a flat key/value map, exactly as the client sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawForm(HashMap<String, String>);

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Later values replace earlier ones.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of an optional field. Blank strings count as absent, since browsers
    /// submit untouched inputs as "".
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Destination link under either its current or legacy field name.
    pub fn destination_link(&self) -> Option<&str> {
        self.optional(fields::DESTINATION_LINK)
            .or_else(|| self.optional(fields::GOOGLE_MAPS_LINK))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Validated, immutable input for one generation call.
///
/// Constructed only by `domain::validation::validate_form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    business_name: String,
    product_or_service: String,
    positive_experience: Option<String>,
    destination_link: Option<String>,
}

impl ReviewRequest {
    pub(crate) fn new(
        business_name: String,
        product_or_service: String,
        positive_experience: Option<String>,
        destination_link: Option<String>,
    ) -> Self {
        Self {
            business_name,
            product_or_service,
            positive_experience,
            destination_link,
        }
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn product_or_service(&self) -> &str {
        &self.product_or_service
    }

    pub fn positive_experience(&self) -> Option<&str> {
        self.positive_experience.as_deref()
    }

    pub fn destination_link(&self) -> Option<&str> {
        self.destination_link.as_deref()
    }
}

/// Parsed success payload from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "reviewText")]
    pub review_text: String,
}

/// The only value handed back to the presentation layer.
///
/// Serializes to exactly `{"reviewText": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestOutcome {
    Review {
        #[serde(rename = "reviewText")]
        review_text: String,
    },
    Error {
        error: String,
    },
}

impl RequestOutcome {
    pub fn review(text: impl Into<String>) -> Self {
        Self::Review {
            review_text: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn review_text(&self) -> Option<&str> {
        match self {
            Self::Review { review_text } => Some(review_text),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Review { .. } => None,
            Self::Error { error } => Some(error),
        }
    }
}

/// Sampling parameters attached to one outbound call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    /// `None` leaves the provider's default in place.
    pub temperature: Option<f32>,
}

/// One field of the declared output schema. All fields are strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Expected shape of the model's structured response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    /// `{ reviewText: string }`, required.
    pub fn review() -> Self {
        Self {
            fields: vec![SchemaField {
                name: "reviewText",
                description: "The generated positive review text.",
                required: true,
            }],
        }
    }

    /// Standard JSON Schema rendering (lowercase type names).
    pub fn to_json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.to_string(),
                    serde_json::json!({ "type": "string", "description": f.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Complete outbound request for a `GenerationPort`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPrompt {
    pub text: String,
    pub schema: OutputSchema,
    pub params: GenerationParams,
}

/// Last-used business details, kept by the presentation layer between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub destination_link: String,
    pub business_name: String,
    pub product_or_service: String,
}

/// Stored form of a profile, stamped with when it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub profile: BusinessProfile,
    pub saved_at: DateTime<Utc>,
}
