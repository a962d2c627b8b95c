//! Application configuration. Provider selection, credentials, prompt mode, paths.

use crate::domain::PromptMode;
use crate::domain::prompt::DEFAULT_DIVERSITY_TEMPERATURE;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default location of the saved business profile.
pub const DEFAULT_PROFILE_PATH: &str = "./data/profile.json";

/// Which `GenerationPort` adapter to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "unknown provider '{}' (expected gemini, openai or mock)",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Provider name. Read from REVIEW_FORGE_PROVIDER.
    #[serde(default)]
    pub provider: Option<String>,

    /// Prompt mode name. Read from REVIEW_FORGE_PROMPT_MODE.
    #[serde(default)]
    pub prompt_mode: Option<String>,

    /// Sampling temperature for diversity mode. Read from REVIEW_FORGE_DIVERSITY_TEMPERATURE.
    #[serde(default)]
    pub diversity_temperature: Option<f32>,

    /// Model override. Read from REVIEW_FORGE_MODEL.
    #[serde(default)]
    pub model: Option<String>,

    /// Endpoint override (Gemini API root or OpenAI chat completions URL). Read from REVIEW_FORGE_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────────
    /// Gemini API key. Read from GEMINI_API_KEY (or GOOGLE_API_KEY).
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// OpenAI API key. Read from OPENAI_API_KEY.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Saved profile location. Read from REVIEW_FORGE_PROFILE_PATH.
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("REVIEW_FORGE"));
        if let Ok(path) = std::env::var("REVIEW_FORGE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Provider keys use their conventional unprefixed names
        if cfg.gemini_api_key.is_none() {
            cfg.gemini_api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok();
        }
        if cfg.openai_api_key.is_none() {
            cfg.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        Ok(cfg)
    }

    /// Returns the configured provider. Defaults to Gemini.
    pub fn provider_kind(&self) -> Result<ProviderKind, String> {
        self.provider
            .as_deref()
            .map(str::parse::<ProviderKind>)
            .unwrap_or(Ok(ProviderKind::default()))
    }

    /// Returns the configured prompt mode. Defaults to diversity.
    pub fn prompt_mode(&self) -> Result<PromptMode, String> {
        self.prompt_mode
            .as_deref()
            .map(str::parse::<PromptMode>)
            .unwrap_or(Ok(PromptMode::default()))
    }

    /// Returns the diversity temperature. Defaults to 0.95.
    pub fn diversity_temperature_or_default(&self) -> f32 {
        self.diversity_temperature
            .unwrap_or(DEFAULT_DIVERSITY_TEMPERATURE)
    }

    /// Returns the model override, or `default` for the active provider.
    pub fn model_or(&self, default: &str) -> String {
        self.model.clone().unwrap_or_else(|| default.to_string())
    }

    /// Returns the endpoint override, or `default` for the active provider.
    pub fn api_url_or(&self, default: &str) -> String {
        self.api_url.clone().unwrap_or_else(|| default.to_string())
    }

    /// Returns the saved profile path. Defaults to ./data/profile.json.
    pub fn profile_path_or_default(&self) -> String {
        self.profile_path
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
    }

    /// Returns the credential for the given provider, if any (never logged).
    pub fn api_key_for(&self, provider: ProviderKind) -> Option<String> {
        match provider {
            ProviderKind::Gemini => self.gemini_api_key.clone(),
            ProviderKind::OpenAi => self.openai_api_key.clone(),
            ProviderKind::Mock => None,
        }
        .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.provider_kind(), Ok(ProviderKind::Gemini));
        assert_eq!(cfg.prompt_mode(), Ok(PromptMode::Diversity));
        assert_eq!(cfg.diversity_temperature_or_default(), 0.95);
        assert_eq!(cfg.profile_path_or_default(), DEFAULT_PROFILE_PATH);
        assert_eq!(cfg.model_or("gemini-2.0-flash"), "gemini-2.0-flash");
    }

    #[test]
    fn test_overrides_parse() {
        let cfg = AppConfig {
            provider: Some("OpenAI".into()),
            prompt_mode: Some("literal".into()),
            openai_api_key: Some("sk-test".into()),
            gemini_api_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.provider_kind(), Ok(ProviderKind::OpenAi));
        assert_eq!(cfg.prompt_mode(), Ok(PromptMode::Literal));
        assert_eq!(cfg.api_key_for(ProviderKind::OpenAi).as_deref(), Some("sk-test"));
        assert_eq!(cfg.api_key_for(ProviderKind::Gemini), None);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let cfg = AppConfig {
            provider: Some("llamafile".into()),
            ..Default::default()
        };
        assert!(cfg.provider_kind().unwrap_err().contains("llamafile"));
    }
}
