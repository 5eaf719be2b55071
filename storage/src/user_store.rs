//! Registered users, looked up by internal id or Telegram id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::models::UserRecord;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AlreadyExists` when the external id is registered.
    async fn create(&self, user: UserRecord) -> Result<UserRecord, StorageError>;

    async fn get_by_id(&self, id: &str) -> Result<UserRecord, StorageError>;

    async fn get_by_external_id(&self, external_id: i64) -> Result<UserRecord, StorageError>;

    async fn exists(&self, external_id: i64) -> Result<bool, StorageError> {
        match self.get_by_external_id(external_id).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<String, UserRecord>,
    by_external: HashMap<i64, String>,
}

/// Volatile [`UserStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: UserRecord) -> Result<UserRecord, StorageError> {
        let mut users = self.users.write().await;
        if users.by_external.contains_key(&user.external_id) {
            return Err(StorageError::AlreadyExists(format!(
                "user with external id {}",
                user.external_id
            )));
        }
        users.by_external.insert(user.external_id, user.id.clone());
        users.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<UserRecord, StorageError> {
        self.users
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("user {}", id)))
    }

    async fn get_by_external_id(&self, external_id: i64) -> Result<UserRecord, StorageError> {
        let users = self.users.read().await;
        users
            .by_external
            .get(&external_id)
            .and_then(|id| users.by_id.get(id))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("user with external id {}", external_id)))
    }
}
