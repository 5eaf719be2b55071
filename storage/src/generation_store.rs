//! Keyed storage of generation records; no business logic.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::GenerationRecord;

/// Store contract for [`GenerationRecord`]s.
///
/// Operations are atomic per record. Guard-then-update sequences spanning several calls are
/// serialized by the caller (the orchestrator's per-record locks).
#[async_trait]
pub trait GenerationRecordStore: Send + Sync {
    /// Inserts a new record. Fails with `AlreadyExists` when the id is taken.
    async fn create(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError>;

    /// Fetches a record by id, `NotFound` when absent.
    async fn get_by_id(&self, id: &str) -> Result<GenerationRecord, StorageError>;

    /// Fetches the record bound to an engine task id, `NotFound` when absent.
    async fn get_by_task_id(&self, task_id: &str) -> Result<GenerationRecord, StorageError>;

    /// Replaces the stored record wholesale, keyed by `record.id`.
    ///
    /// Fails with `NotFound` when no record has that id and with `AlreadyExists` when the
    /// record's task id is already bound to a different record.
    async fn update(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError>;
}
