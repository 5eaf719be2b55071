//! Minimal Telegram connection config: token and optional API URL override.

use anyhow::Result;
use std::env;
use tracing::info;

pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// Loads `BOT_TOKEN` (required) and `TELEGRAM_API_URL` / `TELOXIDE_API_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
        })
    }

    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    pub fn with_api_url(mut self, telegram_api_url: Option<String>) -> Self {
        self.telegram_api_url = telegram_api_url;
        self
    }

    /// Builds the teloxide bot, pointed at the override API URL when one is set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match &self.telegram_api_url {
            Some(url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", url_str, e))?;
                info!(api_url = %url, "Using custom Telegram API URL");
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
