//! AI adapter module. Implements GenerationPort for hosted LLMs.
//!
//! Provides Gemini and OpenAI-compatible adapters, plus a mock adapter for testing.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod openai_adapter;
pub mod response;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::{MockGenerationAdapter, MockReply};
pub use openai_adapter::OpenAiAdapter;
