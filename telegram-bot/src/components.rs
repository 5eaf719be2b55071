//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use dbot_telegram::{TelegramBotAdapter, TelegramConfig};
use generation::{GenerationOrchestrator, OrchestratorOptions, TracingExceptionReporter};
use handler_chain::HandlerChain;
use image_generation_client::{FusaraClient, ImageGenerationEngine};
use image_handlers::{AuthHandler, ImageGenerationHandler, RegistrationHandler};
use notification::{NotificationChannel, ThrottledChannel};
use std::sync::Arc;
use storage::{
    GenerationRecordStore, InMemoryGenerationStore, InMemoryUserStore, SqliteGenerationStore,
    UserStore,
};
use tracing::{error, info, instrument};

use crate::config::{BotConfig, GenerationStoreKind};

/// Everything run_bot needs, wired once at startup.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    /// Outbound chat transport used by handlers and notifications.
    pub bot: Arc<dyn dbot_core::Bot>,
    pub generation_store: Arc<dyn GenerationRecordStore>,
    pub user_store: Arc<dyn UserStore>,
    pub engine: Arc<dyn ImageGenerationEngine>,
    pub notifier: Arc<dyn NotificationChannel>,
    pub orchestrator: Arc<GenerationOrchestrator>,
}

/// Creates the generation record store selected by GENERATION_STORE.
#[instrument(skip(config))]
pub async fn create_generation_store(config: &BotConfig) -> Result<Arc<dyn GenerationRecordStore>> {
    match config.generation_store() {
        GenerationStoreKind::Sqlite => {
            info!(db_path = %config.database_url(), "Using SQLite generation store");
            let store = SqliteGenerationStore::new(config.database_url())
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to initialize SQLite generation store");
                    anyhow::anyhow!("Failed to initialize SQLite generation store: {}", e)
                })?;
            Ok(Arc::new(store))
        }
        GenerationStoreKind::Memory => {
            info!("Using in-memory generation store");
            Ok(Arc::new(InMemoryGenerationStore::new()))
        }
    }
}

/// Builds BotComponents around the given store.
///
/// `bot_override` / `engine_override` replace the Telegram adapter and the Fusara client
/// (tests inject recording mocks).
#[instrument(skip_all)]
pub async fn build_bot_components(
    config: &BotConfig,
    generation_store: Arc<dyn GenerationRecordStore>,
    bot_override: Option<Arc<dyn dbot_core::Bot>>,
    engine_override: Option<Arc<dyn ImageGenerationEngine>>,
) -> Result<BotComponents> {
    let teloxide_bot = TelegramConfig::with_token(config.bot_token().to_string())
        .with_api_url(config.telegram_api_url().map(str::to_string))
        .build_bot()?;

    let bot: Arc<dyn dbot_core::Bot> = match bot_override {
        Some(bot) => bot,
        None => Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())),
    };

    let generation = config.generation();
    let engine: Arc<dyn ImageGenerationEngine> = match engine_override {
        Some(engine) => engine,
        None => Arc::new(
            FusaraClient::with_base_url(
                generation.fusara_api_key.clone(),
                generation.fusara_api_url.clone(),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build Fusara client: {}", e))?,
        ),
    };

    let notifier: Arc<dyn NotificationChannel> =
        Arc::new(ThrottledChannel::new(bot.clone(), generation.throttle()));
    let user_store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());

    let orchestrator = Arc::new(GenerationOrchestrator::new(
        generation_store.clone(),
        engine.clone(),
        notifier.clone(),
        Arc::new(TracingExceptionReporter),
        generation.callback_url.clone(),
        OrchestratorOptions {
            enhance_prompt: generation.enhance_prompt,
            delivery: generation.delivery(),
        },
    ));

    Ok(BotComponents {
        teloxide_bot,
        bot,
        generation_store,
        user_store,
        engine,
        notifier,
        orchestrator,
    })
}

/// Initializes BotComponents from config (creates the store, then builds components).
#[instrument(skip(config))]
pub async fn initialize_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let store = create_generation_store(config).await?;
    build_bot_components(config, store, None, None).await
}

/// Builds the handler chain (auth → registration → prompt submission).
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(AuthHandler::new(
            components.bot.clone(),
            config.allowed_telegram_user_ids().iter().copied(),
        )))
        .add_handler(Arc::new(RegistrationHandler::new(
            components.bot.clone(),
            components.user_store.clone(),
        )))
        .add_handler(Arc::new(ImageGenerationHandler::new(
            components.bot.clone(),
            components.user_store.clone(),
            components.orchestrator.clone(),
        )))
}
