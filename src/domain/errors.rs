//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Shown to the user for any provider failure; the cause is logged only.
pub const UNEXPECTED_PROVIDER_MESSAGE: &str =
    "An unexpected error occurred while contacting the AI service.";

/// Shown when the provider answered but produced no usable review.
pub const EMPTY_RESULT_MESSAGE: &str =
    "Failed to generate review. The AI did not return any text.";

#[derive(Error, Debug)]
pub enum DomainError {
    /// Field-level messages, in field order.
    #[error("Invalid form data: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Missing or unusable provider setup. The message is meant for the operator.
    #[error("{0}")]
    Configuration(String),

    /// Transport, status or malformed-response failure from the provider.
    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("AI provider returned no review text")]
    EmptyResult,

    #[error("Profile store error: {0}")]
    Profile(String),

    #[error("UI error: {0}")]
    Ui(String),
}

impl DomainError {
    /// Text safe to show an end user. Provider internals never leak through.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) | Self::Configuration(_) => self.to_string(),
            Self::Provider(_) => UNEXPECTED_PROVIDER_MESSAGE.to_string(),
            Self::EmptyResult => EMPTY_RESULT_MESSAGE.to_string(),
            Self::Profile(_) | Self::Ui(_) => self.to_string(),
        }
    }
}
