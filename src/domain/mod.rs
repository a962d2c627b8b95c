//! Core domain layer. No external I/O dependencies.
//!
//! Entities, validation rules and prompt templates live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod prompt;
pub mod validation;

pub use entities::{
    BusinessProfile, GenerationParams, GenerationPrompt, GenerationResult, OutputSchema,
    RawForm, RequestOutcome, ReviewRequest, SchemaField, StoredProfile, fields,
};
pub use errors::DomainError;
pub use prompt::{Persona, PromptBuilder, PromptMode};
pub use validation::validate_form;
