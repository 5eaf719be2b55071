use thiserror::Error;

/// Submission or fetch rejected by the generation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Transport failure or non-success HTTP status.
    #[error("engine request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The engine answered with `succeeded: false`.
    #[error("engine rejected request: {0}")]
    Rejected(String),

    /// The response did not match the expected contract.
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
}
