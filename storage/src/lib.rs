//! Storage crate: generation records, registered users, and their stores.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – GenerationRecord (with its status guards), UserRecord
//! - [`generation_store`] – GenerationRecordStore trait
//! - [`inmemory_store`] – InMemoryGenerationStore (volatile, indexed by id and task id)
//! - [`sqlite_store`] – SqliteGenerationStore (persistent)
//! - [`user_store`] – UserStore trait and InMemoryUserStore
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod generation_store;
mod inmemory_store;
mod models;
mod sqlite_pool;
mod sqlite_store;
mod user_store;

pub use error::StorageError;
pub use generation_store::GenerationRecordStore;
pub use inmemory_store::InMemoryGenerationStore;
pub use models::{GenerationRecord, GenerationStatus, NewGeneration, UserRecord};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteGenerationStore;
pub use user_store::{InMemoryUserStore, UserStore};
