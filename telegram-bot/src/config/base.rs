//! Base config: Telegram connection, logging, storage, allow-list, webhook server bind.

use anyhow::Result;
use std::env;
use std::fmt;
use std::str::FromStr;

use super::{env_or, validate_url};

/// Backing store for generation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStoreKind {
    Memory,
    Sqlite,
}

impl FromStr for GenerationStoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("expected memory or sqlite, got {}", other)),
        }
    }
}

impl fmt::Display for GenerationStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub log_file: String,
    /// SQLite file used when `generation_store` is sqlite
    pub database_url: String,
    pub generation_store: GenerationStoreKind,
    /// ALLOWED_TELEGRAM_USER_IDS, comma separated
    pub allowed_telegram_user_ids: Vec<i64>,
    pub server_host: String,
    pub port: u16,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/image-bot.log".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./data/generations.db".to_string());
        let generation_store = env_or("GENERATION_STORE", GenerationStoreKind::Memory)?;
        let allowed_telegram_user_ids =
            parse_user_ids(&env::var("ALLOWED_TELEGRAM_USER_IDS").unwrap_or_default())?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", 8080u16)?;

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            generation_store,
            allowed_telegram_user_ids,
            server_host,
            port,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            validate_url("TELEGRAM_API_URL (or TELOXIDE_API_URL)", url_str)?;
        }
        Ok(())
    }

    /// `host:port` for the webhook listener.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.port)
    }
}

/// Parses `"1, 2,3"` into ids; blank entries are ignored.
pub(crate) fn parse_user_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| anyhow::anyhow!("ALLOWED_TELEGRAM_USER_IDS has an invalid id: {}", s))
        })
        .collect()
}
