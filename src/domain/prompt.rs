//! Prompt construction. Modes and personas are closed sets; rendering is pure.

use super::entities::{GenerationParams, GenerationPrompt, OutputSchema, ReviewRequest};
use std::fmt;
use std::str::FromStr;

/// Sampling temperature used by diversity mode unless configured otherwise.
pub const DEFAULT_DIVERSITY_TEMPERATURE: f32 = 0.95;

/// Active prompt-construction policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PromptMode {
    /// Quote the customer's own experience and ask for one review reflecting it.
    Literal,
    /// No narrative: invent a short, enthusiastic review from name and product.
    Embellish,
    /// No narrative: write as one of several personas at high temperature.
    #[default]
    Diversity,
}

impl PromptMode {
    pub const ALL: [PromptMode; 3] = [Self::Literal, Self::Embellish, Self::Diversity];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Embellish => "embellish",
            Self::Diversity => "diversity",
        }
    }

    /// Whether the form must carry a positive-experience narrative.
    pub fn requires_experience(self) -> bool {
        matches!(self, Self::Literal)
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "embellish" => Ok(Self::Embellish),
            "diversity" => Ok(Self::Diversity),
            other => Err(format!(
                "unknown prompt mode '{}' (expected literal, embellish or diversity)",
                other
            )),
        }
    }
}

/// Customer voices offered to the model in diversity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    FirstTimeCustomer,
    LoyalCustomer,
    SkepticTurnedFan,
    ServiceFocused,
    QualityFocused,
    ValueFocused,
    DomainProfessional,
}

impl Persona {
    pub const ALL: [Persona; 7] = [
        Self::FirstTimeCustomer,
        Self::LoyalCustomer,
        Self::SkepticTurnedFan,
        Self::ServiceFocused,
        Self::QualityFocused,
        Self::ValueFocused,
        Self::DomainProfessional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstTimeCustomer => "First-time customer",
            Self::LoyalCustomer => "Loyal customer",
            Self::SkepticTurnedFan => "Skeptic turned fan",
            Self::ServiceFocused => "Service-focused customer",
            Self::QualityFocused => "Quality-focused customer",
            Self::ValueFocused => "Value-focused customer",
            Self::DomainProfessional => "Domain professional",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FirstTimeCustomer => "tried the business for the first time and was pleasantly surprised",
            Self::LoyalCustomer => "keeps coming back and explains why",
            Self::SkepticTurnedFan => "expected little and was won over",
            Self::ServiceFocused => "cares most about how they were treated by the staff",
            Self::QualityFocused => "notices craftsmanship, freshness or attention to detail",
            Self::ValueFocused => "cares about getting a lot for what they paid",
            Self::DomainProfessional => "works in the same field and judges it with an expert eye",
        }
    }
}

/// Renders prompts for one configured mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptBuilder {
    mode: PromptMode,
    diversity_temperature: f32,
}

impl PromptBuilder {
    pub fn new(mode: PromptMode) -> Self {
        Self {
            mode,
            diversity_temperature: DEFAULT_DIVERSITY_TEMPERATURE,
        }
    }

    /// Override the diversity-mode temperature. Clamped to `0.0..=2.0`.
    pub fn with_diversity_temperature(mut self, temperature: f32) -> Self {
        self.diversity_temperature = if temperature.is_finite() {
            temperature.clamp(0.0, 2.0)
        } else {
            DEFAULT_DIVERSITY_TEMPERATURE
        };
        self
    }

    pub fn mode(&self) -> PromptMode {
        self.mode
    }

    /// Sampling parameters for the active mode.
    pub fn params(&self) -> GenerationParams {
        match self.mode {
            PromptMode::Diversity => GenerationParams {
                temperature: Some(self.diversity_temperature),
            },
            PromptMode::Literal | PromptMode::Embellish => GenerationParams::default(),
        }
    }

    /// Render the prompt text for a validated request.
    pub fn render(&self, request: &ReviewRequest) -> String {
        match self.mode {
            PromptMode::Literal => render_literal(request),
            PromptMode::Embellish => render_embellish(request),
            PromptMode::Diversity => render_diversity(request),
        }
    }

    /// Text, expected schema and sampling parameters in one bundle.
    pub fn prompt(&self, request: &ReviewRequest) -> GenerationPrompt {
        GenerationPrompt {
            text: self.render(request),
            schema: OutputSchema::review(),
            params: self.params(),
        }
    }
}

fn render_literal(request: &ReviewRequest) -> String {
    format!(
        "You are a helpful assistant that crafts positive business reviews.\n\
         \n\
         Based on the following information, write a single positive review for the business. \
         Stay faithful to the customer's experience as described.\n\
         \n\
         Business Name: {}\n\
         Product or Service: {}\n\
         Positive Experience: {}\n\
         \n\
         Review:\n",
        request.business_name(),
        request.product_or_service(),
        request.positive_experience().unwrap_or_default(),
    )
}

fn render_embellish(request: &ReviewRequest) -> String {
    format!(
        "You are a helpful assistant that crafts positive business reviews.\n\
         \n\
         Write a short, enthusiastic review for the business below, as a happy customer would. \
         Invent plausible, specific details about the product or service. \
         Keep it concise: a few sentences, no headings, no hashtags.\n\
         \n\
         Business Name: {}\n\
         Product or Service: {}\n\
         \n\
         Review:\n",
        request.business_name(),
        request.product_or_service(),
    )
}

fn render_diversity(request: &ReviewRequest) -> String {
    let personas: String = Persona::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}: {}\n", i + 1, p.label(), p.description()))
        .collect();
    format!(
        "You are a helpful assistant that crafts positive business reviews.\n\
         \n\
         Many different customers ask you for reviews of the same business, so every review \
         must sound like a different person wrote it. Silently pick ONE of these personas and \
         write as them:\n\
         {}\
         \n\
         Rules:\n\
         - Do not reuse openings, phrases or sentence structures from reviews you may have written before.\n\
         - Write 2-4 sentences.\n\
         - Mention the product or service by name.\n\
         - Do not name the persona you chose.\n\
         \n\
         Business Name: {}\n\
         Product or Service: {}\n\
         \n\
         Review:\n",
        personas,
        request.business_name(),
        request.product_or_service(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RawForm, fields};
    use crate::domain::validation::validate_form;

    fn request(mode: PromptMode) -> ReviewRequest {
        let form = RawForm::new()
            .with(fields::BUSINESS_NAME, "The Corner Cafe")
            .with(fields::PRODUCT_OR_SERVICE, "Iced Latte")
            .with(
                fields::POSITIVE_EXPERIENCE,
                "Staff was incredibly friendly and the coffee was the best I've had.",
            );
        validate_form(&form, mode).unwrap()
    }

    #[test]
    fn test_render_is_deterministic() {
        for mode in PromptMode::ALL {
            let builder = PromptBuilder::new(mode);
            let req = request(mode);
            assert_eq!(builder.render(&req), builder.render(&req));
            assert_eq!(builder.prompt(&req), builder.prompt(&req));
        }
    }

    #[test]
    fn test_literal_includes_experience_verbatim() {
        let text = PromptBuilder::new(PromptMode::Literal).render(&request(PromptMode::Literal));
        assert!(text.contains("Business Name: The Corner Cafe"));
        assert!(text.contains("Product or Service: Iced Latte"));
        assert!(text.contains(
            "Positive Experience: Staff was incredibly friendly and the coffee was the best I've had."
        ));
    }

    #[test]
    fn test_embellish_omits_experience() {
        let text =
            PromptBuilder::new(PromptMode::Embellish).render(&request(PromptMode::Embellish));
        assert!(text.contains("The Corner Cafe"));
        assert!(text.contains("concise"));
        assert!(!text.contains("Staff was incredibly friendly"));
    }

    #[test]
    fn test_diversity_lists_every_persona() {
        let text =
            PromptBuilder::new(PromptMode::Diversity).render(&request(PromptMode::Diversity));
        for persona in Persona::ALL {
            assert!(text.contains(persona.label()), "missing {}", persona.label());
        }
        assert!(text.contains("2-4 sentences"));
        assert!(text.contains("Do not reuse"));
        assert!(!text.contains("Staff was incredibly friendly"));
    }

    #[test]
    fn test_only_diversity_raises_temperature() {
        assert_eq!(
            PromptBuilder::new(PromptMode::Diversity).params().temperature,
            Some(DEFAULT_DIVERSITY_TEMPERATURE)
        );
        assert_eq!(PromptBuilder::new(PromptMode::Literal).params().temperature, None);
        assert_eq!(PromptBuilder::new(PromptMode::Embellish).params().temperature, None);
    }

    #[test]
    fn test_diversity_temperature_clamped() {
        let builder = PromptBuilder::new(PromptMode::Diversity).with_diversity_temperature(7.0);
        assert_eq!(builder.params().temperature, Some(2.0));
        let builder =
            PromptBuilder::new(PromptMode::Diversity).with_diversity_temperature(f32::NAN);
        assert_eq!(builder.params().temperature, Some(DEFAULT_DIVERSITY_TEMPERATURE));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Literal".parse::<PromptMode>(), Ok(PromptMode::Literal));
        assert_eq!(" diversity ".parse::<PromptMode>(), Ok(PromptMode::Diversity));
        assert!("creative".parse::<PromptMode>().is_err());
        assert_eq!(PromptMode::default(), PromptMode::Diversity);
    }
}
