//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; review generation is delegated to ReviewService.

use dotenv::dotenv;
use review_forge::adapters::ai::gemini_adapter::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use review_forge::adapters::ai::openai_adapter::{DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL};
use review_forge::adapters::ai::{GeminiAdapter, MockGenerationAdapter, OpenAiAdapter};
use review_forge::adapters::persistence::ProfileJson;
use review_forge::adapters::ui::TuiInputPort;
use review_forge::domain::PromptBuilder;
use review_forge::ports::{GenerationPort, InputPort, ProfileStorePort};
use review_forge::shared::config::{AppConfig, ProviderKind};
use review_forge::usecases::ReviewService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr so they do not interleave with the prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    let provider = cfg.provider_kind().map_err(anyhow::Error::msg)?;
    let mode = cfg.prompt_mode().map_err(anyhow::Error::msg)?;

    // --- Generation provider ---
    let generator: Arc<dyn GenerationPort> = match provider {
        ProviderKind::Gemini => {
            let model = cfg.model_or(DEFAULT_GEMINI_MODEL);
            info!(model = %model, "using Gemini provider");
            Arc::new(GeminiAdapter::new(
                cfg.api_url_or(DEFAULT_GEMINI_BASE_URL),
                cfg.api_key_for(provider),
                model,
            ))
        }
        ProviderKind::OpenAi => {
            let model = cfg.model_or(DEFAULT_OPENAI_MODEL);
            info!(model = %model, "using OpenAI-compatible provider");
            Arc::new(OpenAiAdapter::new(
                cfg.api_url_or(DEFAULT_OPENAI_API_URL),
                cfg.api_key_for(provider),
                model,
            ))
        }
        ProviderKind::Mock => {
            warn!("using mock provider; reviews are canned");
            Arc::new(MockGenerationAdapter::new())
        }
    };
    // Also reported per request; logged here for the operator.
    if let Err(e) = generator.ensure_configured() {
        warn!(provider = %provider, "{}", e);
    }

    // --- Review pipeline ---
    let prompts = PromptBuilder::new(mode)
        .with_diversity_temperature(cfg.diversity_temperature_or_default());
    info!(mode = %mode, temperature = ?prompts.params().temperature, "prompt mode");
    let review_service = Arc::new(ReviewService::new(generator, prompts));

    // --- Presentation ---
    let profile_path = cfg.profile_path_or_default();
    info!(path = %profile_path, "profile store");
    let profiles: Arc<dyn ProfileStorePort> = Arc::new(ProfileJson::new(&profile_path));

    review_forge::adapters::ui::init_ui();

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(review_service, profiles));
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
