use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, DbotError, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use storage::{StorageError, UserRecord, UserStore};
use tracing::{info, instrument};

use crate::messages::{welcome_message, MSG_ALREADY_REGISTERED, MSG_REGISTERED, MSG_REGISTER_FIRST};

/// Handles `/start` (greeting) and `/register` (creates the user). Other messages pass through.
pub struct RegistrationHandler {
    bot: Arc<dyn CoreBot>,
    users: Arc<dyn UserStore>,
}

fn storage_error(e: StorageError) -> DbotError {
    DbotError::Database(e.to_string())
}

impl RegistrationHandler {
    pub fn new(bot: Arc<dyn CoreBot>, users: Arc<dyn UserStore>) -> Self {
        Self { bot, users }
    }

    async fn start(&self, message: &Message) -> Result<()> {
        match self.users.get_by_external_id(message.user.id).await {
            Ok(user) => {
                self.bot
                    .reply_to(message, &welcome_message(user.display_name()))
                    .await
            }
            Err(StorageError::NotFound(_)) => self.bot.reply_to(message, MSG_REGISTER_FIRST).await,
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn register(&self, message: &Message) -> Result<()> {
        if self.users.exists(message.user.id).await.map_err(storage_error)? {
            return self.bot.reply_to(message, MSG_ALREADY_REGISTERED).await;
        }

        let user = UserRecord::new(
            message.user.id,
            message.user.first_name.clone(),
            message.user.last_name.clone(),
        );
        match self.users.create(user).await {
            Ok(user) => {
                info!(user_id = %user.id, external_id = user.external_id, "User registered");
                self.bot.reply_to(message, MSG_REGISTERED).await
            }
            // Lost a race with a concurrent /register from the same sender.
            Err(StorageError::AlreadyExists(_)) => {
                self.bot.reply_to(message, MSG_ALREADY_REGISTERED).await
            }
            Err(e) => Err(storage_error(e)),
        }
    }
}

#[async_trait]
impl Handler for RegistrationHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match message.command() {
            Some("start") => self.start(message).await?,
            Some("register") => self.register(message).await?,
            _ => return Ok(HandlerResponse::Continue),
        }
        Ok(HandlerResponse::Stop)
    }
}
