use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Handler, Message, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::messages::MSG_NOT_ALLOWED;

/// Lets through only senders on the allow-list; everyone else gets a refusal and the chain
/// stops. An empty allow-list admits nobody.
pub struct AuthHandler {
    bot: Arc<dyn CoreBot>,
    allowed_user_ids: HashSet<i64>,
}

impl AuthHandler {
    pub fn new(bot: Arc<dyn CoreBot>, allowed_user_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            bot,
            allowed_user_ids: allowed_user_ids.into_iter().collect(),
        }
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_user_ids.contains(&user_id)
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if self.is_allowed(message.user.id) {
            return Ok(true);
        }
        warn!(chat_id = message.chat.id, "Rejected sender outside allow-list");
        self.bot.reply_to(message, MSG_NOT_ALLOWED).await?;
        Ok(false)
    }
}
