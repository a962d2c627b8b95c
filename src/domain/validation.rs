//! Form validation. The only way to obtain a `ReviewRequest`.

use super::entities::{RawForm, ReviewRequest, fields};
use super::errors::DomainError;
use super::prompt::PromptMode;
use url::Url;

/// Minimum length of the positive-experience narrative, in characters.
pub const MIN_EXPERIENCE_CHARS: usize = 20;

/// Validate a raw submission for the given mode.
///
/// All failing fields are reported at once, in field order. Accepted values
/// are carried into the request verbatim.
pub fn validate_form(form: &RawForm, mode: PromptMode) -> Result<ReviewRequest, DomainError> {
    let mut errors = Vec::new();

    let business_name = required_text(form, fields::BUSINESS_NAME);
    if business_name.is_none() {
        errors.push("Business name is required.".to_string());
    }

    let product_or_service = required_text(form, fields::PRODUCT_OR_SERVICE);
    if product_or_service.is_none() {
        errors.push("Product or service is required.".to_string());
    }

    let positive_experience = form.optional(fields::POSITIVE_EXPERIENCE);
    match positive_experience {
        Some(text) if text.trim().chars().count() < MIN_EXPERIENCE_CHARS => {
            errors.push(format!(
                "Positive experience must be at least {} characters.",
                MIN_EXPERIENCE_CHARS
            ));
        }
        None if mode.requires_experience() => {
            errors.push("Positive experience is required.".to_string());
        }
        _ => {}
    }

    let destination_link = form.destination_link();
    if let Some(link) = destination_link {
        if !is_web_url(link) {
            errors.push("Destination link must be a valid http(s) URL.".to_string());
        }
    }

    match (business_name, product_or_service) {
        (Some(name), Some(product)) if errors.is_empty() => Ok(ReviewRequest::new(
            name.to_string(),
            product.to_string(),
            positive_experience.map(str::to_string),
            destination_link.map(str::to_string),
        )),
        _ => Err(DomainError::Validation(errors)),
    }
}

fn required_text<'a>(form: &'a RawForm, key: &str) -> Option<&'a str> {
    form.get(key).filter(|v| !v.trim().is_empty())
}

fn is_web_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
