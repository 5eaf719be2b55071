//! # Telegram image bot application
//!
//! Wires storage, the Fusara engine client, throttled notifications, the generation
//! orchestrator and the chat handlers. Runs the Telegram REPL next to the engine webhook server.

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;
pub mod server;

pub use cli::{load_config, Cli, Commands};
pub use components::{
    build_bot_components, build_handler_chain, create_generation_store,
    initialize_bot_components, BotComponents,
};
pub use config::{BaseConfig, BotConfig, GenerationConfig, GenerationStoreKind};
pub use runner::run_bot;
pub use server::{router, run_server, serve, EngineStatus, ALIVE_PATH, GENERATION_COMPLETED_PATH};
