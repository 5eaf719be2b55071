//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code sends via Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, DbotError, Photo, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, InputMedia, InputMediaPhoto};

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn photo_file(url: &str) -> Result<InputFile> {
    let url = reqwest::Url::parse(url)
        .map_err(|e| DbotError::Bot(format!("Invalid photo url {}: {}", url, e)))?;
    Ok(InputFile::url(url))
}

fn media_photo(photo: &Photo) -> Result<InputMedia> {
    let mut media = InputMediaPhoto::new(photo_file(&photo.url)?);
    if let Some(caption) = &photo.caption {
        media = media.caption(caption.clone());
    }
    Ok(InputMedia::Photo(media))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, url: &str, caption: Option<&str>) -> Result<()> {
        let request = self.bot.send_photo(ChatId(chat_id), photo_file(url)?);
        let request = match caption {
            Some(caption) => request.caption(caption.to_string()),
            None => request,
        };
        request.await.map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_media_group(&self, chat_id: i64, photos: &[Photo]) -> Result<()> {
        let media = photos.iter().map(media_photo).collect::<Result<Vec<_>>>()?;
        self.bot
            .send_media_group(ChatId(chat_id), media)
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
