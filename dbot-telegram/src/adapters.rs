//! Adapters from Telegram (teloxide) types to dbot_core types.

use dbot_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
///
/// Messages without a sender (channel posts) map to user id 0, which no allow-list contains.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: if self.0.chat.is_private() {
                    "private".to_string()
                } else {
                    "group".to_string()
                },
            },
            content: self.0.text().unwrap_or("").to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}
