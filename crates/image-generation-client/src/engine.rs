use async_trait::async_trait;
use dbot_core::{GeneratedImage, Orientation, Style};

use crate::error::EngineError;

/// Submission to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateImageRequest {
    pub prompt: String,
    /// Ask the engine to rewrite the prompt before generating.
    pub enhance_prompt: bool,
    pub style: Style,
    pub orientation: Orientation,
    /// Where the engine POSTs status changes for this task.
    pub completion_callback_url: String,
}

/// Engine view of a task: its id and whatever images exist so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub task_id: String,
    pub images: Vec<GeneratedImage>,
}

/// External image-generation engine.
#[async_trait]
pub trait ImageGenerationEngine: Send + Sync {
    /// Submits a prompt. Returns the task the engine created for it.
    async fn generate(&self, request: &GenerateImageRequest) -> Result<GenerationTask, EngineError>;

    /// Fetches the current image set of a task.
    async fn get_generated_images(&self, task_id: &str) -> Result<GenerationTask, EngineError>;
}
