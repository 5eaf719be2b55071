use image_generation_client::EngineError;
use notification::DeliveryError;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by [`crate::GenerationOrchestrator`].
///
/// A guard miss is not an error; it is reported as [`crate::Transition::Skipped`].
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The state change was committed; only the notification failed.
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// The engine reported that a task failed.
    #[error("generation {record_id} failed for task {task_id}")]
    TaskFailed { record_id: String, task_id: String },
}

impl From<StorageError> for GenerationError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(what) => GenerationError::NotFound(what),
            other => GenerationError::Storage(other),
        }
    }
}
