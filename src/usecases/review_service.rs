//! Review service. Orchestrates validation, prompt building and generation.
//!
//! The only entry point presentation code should call. Nothing fails past it:
//! every error becomes a `RequestOutcome::Error`.

use crate::domain::{
    DomainError, GenerationResult, PromptBuilder, RawForm, RequestOutcome, validate_form,
};
use crate::ports::GenerationPort;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Generating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validating => "validating",
            Self::Generating => "generating",
            Self::Done => "done",
        })
    }
}

/// Service for turning form submissions into reviews.
///
/// Orchestrates the flow:
/// 1. Check that the provider has a credential
/// 2. Validate the form into a `ReviewRequest`
/// 3. Render the prompt for the configured mode
/// 4. Make exactly one provider call
pub struct ReviewService {
    generator: Arc<dyn GenerationPort>,
    prompts: PromptBuilder,
}

impl ReviewService {
    /// Create a new review service.
    ///
    /// # Arguments
    /// * `generator` - Provider port implementation (Gemini, OpenAI, Mock)
    /// * `prompts` - Prompt builder for the active mode
    pub fn new(generator: Arc<dyn GenerationPort>, prompts: PromptBuilder) -> Self {
        Self { generator, prompts }
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Handle one submission and map the result for the caller.
    pub async fn handle(&self, form: &RawForm) -> RequestOutcome {
        let span = info_span!("review_request", mode = %self.prompts.mode());
        async {
            let result = self.try_handle(form).await;
            debug!(stage = %Stage::Done, ok = result.is_ok(), "request finished");
            match result {
                Ok(generated) => {
                    info!(review_len = generated.review_text.len(), "review ready");
                    RequestOutcome::review(generated.review_text)
                }
                Err(e) => {
                    match &e {
                        DomainError::Provider(cause) => {
                            error!(error = %cause, "provider call failed")
                        }
                        DomainError::EmptyResult => warn!("provider returned no review text"),
                        other => info!(error = %other, "request rejected"),
                    }
                    RequestOutcome::error(e.user_message())
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Same pipeline as `handle`, with the typed error kept.
    ///
    /// Stages: a missing credential or invalid form ends in `Validating`, a
    /// provider failure ends in `Generating`, and only `Ok` reaches `Done`.
    pub async fn try_handle(&self, form: &RawForm) -> Result<GenerationResult, DomainError> {
        self.generator.ensure_configured()?;

        debug!(stage = %Stage::Validating, fields = ?form_keys(form), "validating form");
        let request = validate_form(form, self.prompts.mode())?;

        debug!(stage = %Stage::Generating, business = %request.business_name(), "calling provider");
        let prompt = self.prompts.prompt(&request);
        self.generator.generate(&prompt).await
    }
}

fn form_keys(form: &RawForm) -> Vec<&'static str> {
    use crate::domain::fields;
    [
        fields::BUSINESS_NAME,
        fields::PRODUCT_OR_SERVICE,
        fields::POSITIVE_EXPERIENCE,
        fields::DESTINATION_LINK,
        fields::GOOGLE_MAPS_LINK,
    ]
    .into_iter()
    .filter(|k| form.get(k).is_some())
    .collect()
}
