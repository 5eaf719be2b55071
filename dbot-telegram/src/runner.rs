//! REPL: converts each teloxide message to a core [`dbot_core::Message`] and hands it to the
//! [`HandlerChain`] on its own task.

use anyhow::Result;
use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;

/// Starts long polling. Returns when the dispatcher stops (e.g. on ctrl-c).
///
/// Non-text messages are logged and dropped.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity resolved");
        }
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            if msg.text().is_none() {
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    "Received non-text message, ignoring"
                );
                return Ok(());
            }

            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_id = %core_msg.id,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
