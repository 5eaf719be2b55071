//! Core types: user, chat, message, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity as seen by the chat transport (Telegram user id, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat (group or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// A single inbound text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Returns the command name when the message starts with `/`, without the slash and
    /// without a trailing `@botname` (e.g. `/register@image_bot` → `register`).
    pub fn command(&self) -> Option<&str> {
        let first = self.content.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Message handled; stop the chain.
    Stop,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Chain participant: optional `before` gate, then `handle`. The chain runs every `before`
/// first (any `false` stops it), then `handle` in order until one returns Stop.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }

    /// Processes the message. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
}
