//! # image-handlers
//!
//! Chat handlers for the image bot, run by `handler-chain` in this order:
//!
//! - [`AuthHandler`] – allow-list gate (`before`)
//! - [`RegistrationHandler`] – `/start` and `/register`
//! - [`ImageGenerationHandler`] – any other text from a registered user becomes a prompt

mod auth_handler;
mod image_generation_handler;
mod messages;
mod registration_handler;

pub use auth_handler::AuthHandler;
pub use image_generation_handler::ImageGenerationHandler;
pub use messages::*;
pub use registration_handler::RegistrationHandler;
