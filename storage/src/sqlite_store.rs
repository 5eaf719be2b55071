//! SQLite generation store: survives restarts.
//!
//! Table `generation_records`, primary key `id`, unique index on `generation_task_id`;
//! images are kept as a JSON array in a TEXT column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::generation_store::GenerationRecordStore;
use crate::models::GenerationRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteGenerationStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteGenerationStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating generation_records table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS generation_records (
                id TEXT PRIMARY KEY,
                prompt TEXT NOT NULL,
                style TEXT NOT NULL,
                orientation TEXT NOT NULL,
                images TEXT NOT NULL,
                user_id TEXT NOT NULL,
                chat_id INTEGER NOT NULL,
                generation_task_id TEXT,
                generation_status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_generation_records_task_id ON generation_records(generation_task_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    fn from_row(row: &SqliteRow) -> Result<GenerationRecord, StorageError> {
        let images: String = row.try_get("images")?;
        let style: String = row.try_get("style")?;
        let orientation: String = row.try_get("orientation")?;
        let status: String = row.try_get("generation_status")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(GenerationRecord {
            id: row.try_get("id")?,
            prompt: row.try_get("prompt")?,
            style: style.parse().map_err(StorageError::Serialization)?,
            orientation: orientation.parse().map_err(StorageError::Serialization)?,
            images: serde_json::from_str(&images)?,
            user_id: row.try_get("user_id")?,
            chat_id: row.try_get("chat_id")?,
            generation_task_id: row.try_get("generation_task_id")?,
            generation_status: status.parse().map_err(StorageError::Serialization)?,
            created_at,
        })
    }

    async fn fetch_one_where(
        &self,
        sql: &str,
        key: &str,
        what: &str,
    ) -> Result<GenerationRecord, StorageError> {
        let row = sqlx::query(sql)
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        match row {
            Some(row) => Self::from_row(&row),
            None => Err(StorageError::NotFound(format!("{} {}", what, key))),
        }
    }
}

/// SQLite reports constraint violations as database errors; map unique violations.
fn map_write_error(e: sqlx::Error, record: &GenerationRecord) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::AlreadyExists(format!(
                "generation record {} (task id {:?})",
                record.id, record.generation_task_id
            ));
        }
    }
    StorageError::Database(e.to_string())
}

#[async_trait]
impl GenerationRecordStore for SqliteGenerationStore {
    async fn create(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError> {
        let images = serde_json::to_string(&record.images)?;

        sqlx::query(
            r#"
            INSERT INTO generation_records
                (id, prompt, style, orientation, images, user_id, chat_id, generation_task_id, generation_status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.prompt)
        .bind(record.style.as_str())
        .bind(record.orientation.as_str())
        .bind(images)
        .bind(&record.user_id)
        .bind(record.chat_id)
        .bind(&record.generation_task_id)
        .bind(record.generation_status.as_str())
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| map_write_error(e, &record))?;

        debug!(record_id = %record.id, "generation record inserted");
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> Result<GenerationRecord, StorageError> {
        self.fetch_one_where(
            "SELECT * FROM generation_records WHERE id = ?",
            id,
            "generation record",
        )
        .await
    }

    async fn get_by_task_id(&self, task_id: &str) -> Result<GenerationRecord, StorageError> {
        self.fetch_one_where(
            "SELECT * FROM generation_records WHERE generation_task_id = ?",
            task_id,
            "generation task",
        )
        .await
    }

    async fn update(&self, record: GenerationRecord) -> Result<GenerationRecord, StorageError> {
        let images = serde_json::to_string(&record.images)?;

        let result = sqlx::query(
            r#"
            UPDATE generation_records
            SET prompt = ?, style = ?, orientation = ?, images = ?, user_id = ?, chat_id = ?,
                generation_task_id = ?, generation_status = ?, created_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&record.prompt)
        .bind(record.style.as_str())
        .bind(record.orientation.as_str())
        .bind(images)
        .bind(&record.user_id)
        .bind(record.chat_id)
        .bind(&record.generation_task_id)
        .bind(record.generation_status.as_str())
        .bind(record.created_at)
        .bind(&record.id)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| map_write_error(e, &record))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("generation record {}", record.id)));
        }

        debug!(
            record_id = %record.id,
            status = %record.generation_status,
            "generation record updated"
        );
        Ok(record)
    }
}
