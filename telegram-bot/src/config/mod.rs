//! Bot configuration: BaseConfig (Telegram, log, storage, allow-list, server) + GenerationConfig
//! (engine, callback, notification pacing). Loaded from env.

mod base;
mod bot_config;
mod generation;


pub use base::{BaseConfig, GenerationStoreKind};
pub use bot_config::BotConfig;
pub use generation::GenerationConfig;

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Reads `key` and parses it, falling back to `default` when unset or empty.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is not valid ({}): {}", key, value, e)),
        _ => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => anyhow::bail!("{} must be a boolean, got: {}", key, value),
            }
        }
        _ => Ok(default),
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    if reqwest::Url::parse(value).is_err() {
        anyhow::bail!("{} is not a valid URL: {}", name, value);
    }
    Ok(())
}
