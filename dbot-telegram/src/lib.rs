//! # dbot-telegram
//!
//! Telegram transport layer: [`dbot_core::Bot`] over teloxide, teloxide → core type adapters,
//! minimal connection config and the REPL runner feeding the handler chain.
//! No persistence or generation logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::run_repl;
