//! Error types for the chat layer.
//!
//! [`DbotError`] is the top-level error; [`HandlerError`] is used for handler failures.

use thiserror::Error;

/// Top-level error for the chat layer (transport, handler, generation, config, IO).
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("No text in message")]
    NoText,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("User not registered: {0}")]
    NotRegistered(i64),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
