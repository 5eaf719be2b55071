//! Outbound chat transport.
//!
//! [`Bot`] is transport-agnostic; `dbot-telegram` implements it over teloxide and tests
//! substitute recording mocks.

use crate::error::Result;
use crate::generation::Photo;
use crate::types::Message;
use async_trait::async_trait;

/// Sends text and photos to a chat. Implementations map to a transport (e.g. Telegram).
///
/// Every call is a single request against the transport; pacing between calls is the
/// caller's concern (see the `notification` crate).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(message.chat.id, text).await
    }

    /// Sends one photo by URL with an optional caption.
    async fn send_photo(&self, chat_id: i64, url: &str, caption: Option<&str>) -> Result<()>;

    /// Sends several photos as one grouped album. Only the first photo's caption is shown
    /// under the album by most clients.
    async fn send_media_group(&self, chat_id: i64, photos: &[Photo]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chat, User};
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }

        async fn send_photo(&self, _chat_id: i64, _url: &str, _caption: Option<&str>) -> Result<()> {
            Ok(())
        }

        async fn send_media_group(&self, _chat_id: i64, _photos: &[Photo]) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reply_to_sends_to_message_chat() {
        let bot = RecordingBot::default();
        let message = Message {
            id: "1".to_string(),
            user: User {
                id: 7,
                username: None,
                first_name: Some("Ann".to_string()),
                last_name: None,
            },
            chat: Chat {
                id: -100,
                chat_type: "group".to_string(),
            },
            content: "hi".to_string(),
            created_at: Utc::now(),
        };

        bot.reply_to(&message, "hello").await.unwrap();

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[(-100, "hello".to_string())]);
    }
}
