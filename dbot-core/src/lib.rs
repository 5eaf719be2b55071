//! # dbot-core
//!
//! Core types and traits for the image bot: [`Bot`] (outbound chat transport), [`Handler`],
//! message and user types, the generation vocabulary ([`Style`], [`Orientation`], [`GeneratedImage`])
//! and tracing initialization. Transport-agnostic; used by every other crate in the workspace.

pub mod bot;
pub mod error;
pub mod generation;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{DbotError, HandlerError, Result};
pub use generation::{GeneratedImage, Orientation, Photo, Style};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
