use anyhow::Result;
use dbot_core::init_tracing;
use dbot_telegram::run_repl;
use tracing::{error, info, instrument};

use crate::components::{build_handler_chain, initialize_bot_components};
use crate::config::BotConfig;
use crate::server::run_server;

/// Main entry: validate config, init logging, build components, then run the Telegram REPL
/// and the webhook server side by side. Returns when either stops.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        generation_store = %config.generation_store(),
        allowed_users = config.allowed_telegram_user_ids().len(),
        server_addr = %config.base().server_addr(),
        "Initializing bot"
    );

    let components = initialize_bot_components(&config).await?;
    let handler_chain = build_handler_chain(&config, &components);
    let server_addr = config.base().server_addr();

    info!("Bot started successfully");

    tokio::select! {
        result = run_repl(components.teloxide_bot.clone(), handler_chain) => {
            info!("Telegram REPL stopped");
            result
        }
        result = run_server(&server_addr, components.orchestrator.clone()) => {
            if let Err(ref e) = result {
                error!(error = %e, "Webhook server stopped");
            }
            result
        }
    }
}
