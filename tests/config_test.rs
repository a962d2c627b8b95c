//! `AppConfig::load` against real environment variables and a config file.

use review_forge::domain::PromptMode;
use review_forge::shared::config::{AppConfig, ProviderKind};
use std::sync::Mutex;

/// Tests in this file share the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "REVIEW_FORGE_PROVIDER",
    "REVIEW_FORGE_PROMPT_MODE",
    "REVIEW_FORGE_DIVERSITY_TEMPERATURE",
    "REVIEW_FORGE_MODEL",
    "REVIEW_FORGE_API_URL",
    "REVIEW_FORGE_PROFILE_PATH",
    "REVIEW_FORGE_GEMINI_API_KEY",
    "REVIEW_FORGE_OPENAI_API_KEY",
    "REVIEW_FORGE_CONFIG",
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
    "OPENAI_API_KEY",
];

/// Runs `load()` with exactly `vars` set among the keys it reads.
fn load_with(vars: &[(&str, &str)]) -> AppConfig {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: every test touching the environment holds ENV_LOCK.
    unsafe {
        for key in VARS {
            std::env::remove_var(key);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
    }
    let cfg = AppConfig::load().unwrap();
    unsafe {
        for (key, _) in vars {
            std::env::remove_var(key);
        }
    }
    cfg
}

#[test]
fn prefixed_env_sets_mode_and_temperature() {
    let cfg = load_with(&[
        ("REVIEW_FORGE_PROVIDER", "openai"),
        ("REVIEW_FORGE_PROMPT_MODE", "literal"),
        ("REVIEW_FORGE_DIVERSITY_TEMPERATURE", "0.8"),
        ("REVIEW_FORGE_PROFILE_PATH", "/tmp/forge/profile.json"),
    ]);
    assert_eq!(cfg.provider_kind(), Ok(ProviderKind::OpenAi));
    assert_eq!(cfg.prompt_mode(), Ok(PromptMode::Literal));
    assert!((cfg.diversity_temperature_or_default() - 0.8).abs() < 1e-6);
    assert_eq!(cfg.profile_path_or_default(), "/tmp/forge/profile.json");
}

#[test]
fn unset_env_gives_defaults() {
    let cfg = load_with(&[]);
    assert_eq!(cfg.provider_kind(), Ok(ProviderKind::Gemini));
    assert_eq!(cfg.prompt_mode(), Ok(PromptMode::Diversity));
    assert_eq!(cfg.diversity_temperature_or_default(), 0.95);
    assert_eq!(cfg.api_key_for(ProviderKind::Gemini), None);
}

#[test]
fn gemini_key_from_conventional_names() {
    let cfg = load_with(&[("GEMINI_API_KEY", "gem-key"), ("GOOGLE_API_KEY", "google-key")]);
    assert_eq!(cfg.api_key_for(ProviderKind::Gemini).as_deref(), Some("gem-key"));

    let cfg = load_with(&[("GOOGLE_API_KEY", "google-key")]);
    assert_eq!(cfg.api_key_for(ProviderKind::Gemini).as_deref(), Some("google-key"));
}

#[test]
fn openai_key_from_conventional_name() {
    let cfg = load_with(&[("OPENAI_API_KEY", "sk-env")]);
    assert_eq!(cfg.api_key_for(ProviderKind::OpenAi).as_deref(), Some("sk-env"));
    assert_eq!(cfg.api_key_for(ProviderKind::Mock), None);
}

#[test]
fn prefixed_key_wins_over_conventional_name() {
    let cfg = load_with(&[
        ("REVIEW_FORGE_GEMINI_API_KEY", "prefixed"),
        ("GEMINI_API_KEY", "plain"),
    ]);
    assert_eq!(cfg.api_key_for(ProviderKind::Gemini).as_deref(), Some("prefixed"));
}

#[test]
fn config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("review-forge.toml");
    std::fs::write(
        &path,
        "model = \"gemini-1.5-pro\"\nprompt_mode = \"embellish\"\ndiversity_temperature = 1.2\n",
    )
    .unwrap();

    let cfg = load_with(&[("REVIEW_FORGE_CONFIG", path.to_str().unwrap())]);
    assert_eq!(cfg.model_or("gemini-2.0-flash"), "gemini-1.5-pro");
    assert_eq!(cfg.prompt_mode(), Ok(PromptMode::Embellish));
    assert!((cfg.diversity_temperature_or_default() - 1.2).abs() < 1e-6);
}
