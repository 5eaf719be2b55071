//! Turns free text from a registered user into a generation request.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, DbotError, Handler, HandlerResponse, Message, Orientation, Result, Style};
use generation::{CreateGeneration, GenerationError, GenerationOrchestrator};
use std::sync::Arc;
use storage::{StorageError, UserStore};
use tracing::{debug, error, info, instrument};

use crate::messages::{
    MSG_GENERATION_FAILED, MSG_GENERATION_STARTED, MSG_NOT_UNDERSTOOD, MSG_REGISTER_FIRST,
};

/// Submits every non-command text as a photo, vertical prompt. The generation result arrives
/// later through the orchestrator's notification, not through this handler.
pub struct ImageGenerationHandler {
    bot: Arc<dyn CoreBot>,
    users: Arc<dyn UserStore>,
    orchestrator: Arc<GenerationOrchestrator>,
}

impl ImageGenerationHandler {
    pub fn new(
        bot: Arc<dyn CoreBot>,
        users: Arc<dyn UserStore>,
        orchestrator: Arc<GenerationOrchestrator>,
    ) -> Self {
        Self {
            bot,
            users,
            orchestrator,
        }
    }
}

#[async_trait]
impl Handler for ImageGenerationHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.command().is_some() {
            debug!("Unknown command, not a prompt");
            return Ok(HandlerResponse::Continue);
        }

        let user = match self.users.get_by_external_id(message.user.id).await {
            Ok(user) => user,
            Err(StorageError::NotFound(_)) => {
                self.bot.reply_to(message, MSG_REGISTER_FIRST).await?;
                return Ok(HandlerResponse::Stop);
            }
            Err(e) => return Err(DbotError::Database(e.to_string())),
        };

        let prompt = message.content.trim();
        if prompt.is_empty() {
            self.bot.reply_to(message, MSG_NOT_UNDERSTOOD).await?;
            return Ok(HandlerResponse::Stop);
        }

        let created = self
            .orchestrator
            .create(CreateGeneration {
                prompt: prompt.to_string(),
                style: Style::Photo,
                orientation: Orientation::Vertical,
                user_id: user.id.clone(),
                chat_id: message.chat.id,
                enhance_prompt: None,
            })
            .await;

        match created {
            Ok(record) => {
                info!(record_id = %record.id, "Generation submitted");
                self.bot.reply_to(message, MSG_GENERATION_STARTED).await?;
            }
            Err(GenerationError::Validation(reason)) => {
                debug!(reason = %reason, "Prompt rejected");
                self.bot.reply_to(message, MSG_NOT_UNDERSTOOD).await?;
            }
            Err(e) => {
                error!(error = %e, "Generation request failed");
                self.bot.reply_to(message, MSG_GENERATION_FAILED).await?;
            }
        }
        Ok(HandlerResponse::Stop)
    }
}
