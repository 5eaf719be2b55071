//! # generation
//!
//! Drives generation records through their lifecycle and tells the owning chat how it ended.
//!
//! - [`GenerationOrchestrator`] – create / initialize / complete / fail
//! - [`RecordLocks`] – per-record async locks serializing guard-then-update
//! - [`ExceptionReporter`] – sink for failures worth an operator's attention

mod error;
mod locks;
mod orchestrator;
mod reporter;

pub use error::GenerationError;
pub use locks::{RecordGuard, RecordLocks};
pub use orchestrator::{
    completion_message, failure_message, CompletionDelivery, CreateGeneration,
    GenerationOrchestrator, OrchestratorOptions, Transition,
};
pub use reporter::{ExceptionReporter, TracingExceptionReporter};
