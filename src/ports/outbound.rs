//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{BusinessProfile, DomainError, GenerationPrompt, GenerationResult};

/// Hosted text-generation provider.
///
/// One call to `generate` is exactly one outbound request: no caching, no retries.
#[async_trait::async_trait]
pub trait GenerationPort: Send + Sync {
    /// Fails with `DomainError::Configuration` when no credential is set.
    /// Must not touch the network.
    fn ensure_configured(&self) -> Result<(), DomainError>;

    /// Send the prompt and parse the structured reply.
    ///
    /// # Errors
    /// - `Configuration` if no credential is set (checked before sending)
    /// - `Provider` on transport, status or malformed-response failures
    /// - `EmptyResult` if the reply carries no usable `reviewText`
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<GenerationResult, DomainError>;
}

/// Client-local store for the last-used business profile.
///
/// Owned by the presentation layer; the review pipeline never calls it.
#[async_trait::async_trait]
pub trait ProfileStorePort: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<BusinessProfile>, DomainError>;

    async fn save(&self, profile: &BusinessProfile) -> Result<(), DomainError>;
}
