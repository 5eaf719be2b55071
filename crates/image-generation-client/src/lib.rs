//! # image-generation-client
//!
//! Contract for the external image-generation engine ([`ImageGenerationEngine`]) and its
//! Fusara implementation ([`FusaraClient`]).
//!
//! The engine accepts a prompt, returns a task id immediately, and later calls the completion
//! webhook; the final images are then fetched by task id.

mod engine;
mod error;
mod fusara;

pub use engine::{GenerateImageRequest, GenerationTask, ImageGenerationEngine};
pub use error::EngineError;
pub use fusara::{aspect_ratio, mask_api_key, style_descriptor, target_style_id, FusaraClient};
