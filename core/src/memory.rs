use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::TodoStore;
use crate::types::{DeleteAck, InsertAck, NewTodo, Todo, TodoId};

/// Process-local store used by tests and database-less local runs.
///
/// Records are keyed by id; ObjectIds are time-ordered so listing comes back
/// in roughly insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<TodoId, Option<String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|(id, content)| Todo {
                id: *id,
                content: content.clone(),
            })
            .collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<InsertAck, StoreError> {
        let id = TodoId::generate();
        self.records.write().await.insert(id, todo.content);
        Ok(InsertAck { inserted_id: id })
    }

    async fn delete(&self, id: &TodoId) -> Result<DeleteAck, StoreError> {
        let removed = self.records.write().await.remove(id);
        Ok(DeleteAck {
            deleted_count: u64::from(removed.is_some()),
        })
    }
}
