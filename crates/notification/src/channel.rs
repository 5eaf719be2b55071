use async_trait::async_trait;
use dbot_core::{Bot, Photo};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::error::DeliveryError;
use crate::throttle::ThrottleConfig;

/// Telegram accepts at most this many items in one media group.
pub const MEDIA_GROUP_LIMIT: usize = 10;

/// Outbound notifications to a chat.
///
/// Items are delivered strictly in order; the first failure aborts the rest of the call and
/// is returned. Nothing is retried here.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Sends text messages one at a time. Blank messages are skipped.
    async fn send_messages(&self, chat_id: i64, messages: &[String]) -> Result<(), DeliveryError>;

    /// Sends photos: one photo as a single send, several as grouped albums of at most
    /// [`MEDIA_GROUP_LIMIT`]. Photos without a URL are skipped.
    async fn send_photos(&self, chat_id: i64, photos: &[Photo]) -> Result<(), DeliveryError>;
}

/// [`NotificationChannel`] over a [`Bot`] with a random pause between successive sends.
///
/// The pause is a cooperative `tokio::time::sleep`; callers must not hold locks across calls.
#[derive(Clone)]
pub struct ThrottledChannel {
    bot: Arc<dyn Bot>,
    throttle: ThrottleConfig,
}

impl ThrottledChannel {
    pub fn new(bot: Arc<dyn Bot>, throttle: ThrottleConfig) -> Self {
        Self { bot, throttle }
    }

    pub fn throttle(&self) -> ThrottleConfig {
        self.throttle
    }

    async fn pause(&self) {
        let delay = self.throttle.next_delay();
        debug!(delay_ms = delay.as_millis() as u64, "throttling before next send");
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl NotificationChannel for ThrottledChannel {
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn send_messages(&self, chat_id: i64, messages: &[String]) -> Result<(), DeliveryError> {
        let mut sent_any = false;
        for (index, message) in messages.iter().enumerate() {
            if message.trim().is_empty() {
                continue;
            }
            if sent_any {
                self.pause().await;
            }
            self.bot
                .send_message(chat_id, message)
                .await
                .map_err(|source| {
                    error!(chat_id, index, error = %source, "message delivery failed, dropping rest");
                    DeliveryError::Transport {
                        chat_id,
                        index,
                        source,
                    }
                })?;
            sent_any = true;
        }
        Ok(())
    }

    #[instrument(skip(self, photos), fields(count = photos.len()))]
    async fn send_photos(&self, chat_id: i64, photos: &[Photo]) -> Result<(), DeliveryError> {
        // Keep each photo's position in the caller's slice for error reporting.
        let photos: Vec<(usize, &Photo)> = photos
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.url.trim().is_empty())
            .collect();

        for (group_index, group) in photos.chunks(MEDIA_GROUP_LIMIT).enumerate() {
            if group_index > 0 {
                self.pause().await;
            }
            let index = group[0].0;
            let sent = match group {
                [(_, photo)] => {
                    self.bot
                        .send_photo(chat_id, &photo.url, photo.caption.as_deref())
                        .await
                }
                _ => {
                    let album: Vec<Photo> = group.iter().map(|(_, p)| (*p).clone()).collect();
                    self.bot.send_media_group(chat_id, &album).await
                }
            };
            sent.map_err(|source| {
                error!(chat_id, index, error = %source, "photo delivery failed, dropping rest");
                DeliveryError::Transport {
                    chat_id,
                    index,
                    source,
                }
            })?;
        }
        Ok(())
    }
}
