//! In-memory generation store: records by id plus a task-id index. Data is lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::generation_store::GenerationRecordStore;
use crate::models::GenerationRecord;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, GenerationRecord>,
    /// task id → record id
    by_task: HashMap<String, String>,
}

/// Volatile [`GenerationRecordStore`]; O(1) lookup by id and by task id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenerationStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records in the store.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Inner {
    fn bind_task_id(&mut self, record: &GenerationRecord) -> Result<(), StorageError> {
        let Some(task_id) = record.generation_task_id.as_ref() else {
            return Ok(());
        };
        match self.by_task.get(task_id) {
            Some(owner) if owner != &record.id => Err(StorageError::AlreadyExists(format!(
                "task id {} is bound to record {}",
                task_id, owner
            ))),
            _ => {
                self.by_task.insert(task_id.clone(), record.id.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl GenerationRecordStore for InMemoryGenerationStore {
    async fn create(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError> {
        let mut inner = self.inner.write().await;
        if inner.records.contains_key(&record.id) {
            return Err(StorageError::AlreadyExists(format!("generation record {}", record.id)));
        }
        inner.bind_task_id(&record)?;
        inner.records.insert(record.id.clone(), record.clone());
        debug!(record_id = %record.id, "generation record created");
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> Result<GenerationRecord, StorageError> {
        self.inner
            .read()
            .await
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("generation record {}", id)))
    }

    async fn get_by_task_id(&self, task_id: &str) -> Result<GenerationRecord, StorageError> {
        let inner = self.inner.read().await;
        inner
            .by_task
            .get(task_id)
            .and_then(|id| inner.records.get(id))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("generation task {}", task_id)))
    }

    async fn update(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.records.contains_key(&record.id) {
            return Err(StorageError::NotFound(format!("generation record {}", record.id)));
        }
        inner.bind_task_id(&record)?;
        inner.records.insert(record.id.clone(), record.clone());
        debug!(
            record_id = %record.id,
            status = %record.generation_status,
            "generation record updated"
        );
        Ok(record)
    }
}
