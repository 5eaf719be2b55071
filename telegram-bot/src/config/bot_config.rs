//! BotConfig: BaseConfig + GenerationConfig. Use load() for env-based loading.

use anyhow::Result;

use super::{BaseConfig, GenerationConfig, GenerationStoreKind};

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub generation: GenerationConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let generation = GenerationConfig::from_env()?;
        Ok(Self { base, generation })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.generation.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn generation_store(&self) -> GenerationStoreKind {
        self.base.generation_store
    }
    pub fn allowed_telegram_user_ids(&self) -> &[i64] {
        &self.base.allowed_telegram_user_ids
    }
}
