//! Generation config: Fusara engine, completion callback, notification pacing and delivery.

use anyhow::Result;
use generation::CompletionDelivery;
use notification::ThrottleConfig;
use std::env;

use super::{env_flag, env_or, validate_url};

const DEFAULT_FUSARA_API_URL: &str = "https://api.fusara.ai";

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub fusara_api_key: String,
    pub fusara_api_url: String,
    /// Passed to the engine with every submission; must reach this bot's webhook server.
    pub callback_url: String,
    pub enhance_prompt: bool,
    pub notify_min_delay_ms: u64,
    pub notify_max_delay_ms: u64,
    pub deliver_as_photos: bool,
}

impl GenerationConfig {
    pub fn from_env() -> Result<Self> {
        let fusara_api_key = env::var("FUSARA_API_KEY")
            .map_err(|_| anyhow::anyhow!("FUSARA_API_KEY not set"))?;
        let callback_url = env::var("GENERATION_COMPLETE_CALLBACK_URL")
            .map_err(|_| anyhow::anyhow!("GENERATION_COMPLETE_CALLBACK_URL not set"))?;
        let fusara_api_url =
            env::var("FUSARA_API_URL").unwrap_or_else(|_| DEFAULT_FUSARA_API_URL.to_string());

        Ok(Self {
            fusara_api_key,
            fusara_api_url,
            callback_url,
            enhance_prompt: env_flag("ENHANCE_PROMPT", false)?,
            notify_min_delay_ms: env_or("NOTIFY_MIN_DELAY_MS", 1000u64)?,
            notify_max_delay_ms: env_or("NOTIFY_MAX_DELAY_MS", 3000u64)?,
            deliver_as_photos: env_flag("DELIVER_AS_PHOTOS", false)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.fusara_api_key.trim().is_empty() {
            anyhow::bail!("FUSARA_API_KEY is empty");
        }
        validate_url("FUSARA_API_URL", &self.fusara_api_url)?;
        validate_url("GENERATION_COMPLETE_CALLBACK_URL", &self.callback_url)?;
        if self.notify_min_delay_ms == 0 {
            anyhow::bail!("NOTIFY_MIN_DELAY_MS must be positive");
        }
        if self.notify_min_delay_ms > self.notify_max_delay_ms {
            anyhow::bail!(
                "NOTIFY_MIN_DELAY_MS ({}) must not exceed NOTIFY_MAX_DELAY_MS ({})",
                self.notify_min_delay_ms,
                self.notify_max_delay_ms
            );
        }
        Ok(())
    }

    pub fn throttle(&self) -> ThrottleConfig {
        ThrottleConfig::new(self.notify_min_delay_ms, self.notify_max_delay_ms)
    }

    pub fn delivery(&self) -> CompletionDelivery {
        if self.deliver_as_photos {
            CompletionDelivery::Photos
        } else {
            CompletionDelivery::Text
        }
    }
}
