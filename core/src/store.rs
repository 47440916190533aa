//! The record store contract shared by the MongoDB and in-memory backends.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{DeleteAck, InsertAck, NewTodo, Todo, TodoId};

/// Handle passed to every request handler. Cloning only bumps a refcount.
pub type SharedStore = Arc<dyn TodoStore>;

/// find-all / insert-one / delete-by-id over a single collection.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// Every stored record in store-native order. A failure part-way through
    /// the cursor discards what was already read.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Store a new record and return its generated id.
    async fn insert(&self, todo: NewTodo) -> Result<InsertAck, StoreError>;

    /// Remove the record with this id. A missing id yields a count of 0.
    async fn delete(&self, id: &TodoId) -> Result<DeleteAck, StoreError>;
}

/// Run a store operation with a time budget.
///
/// When the budget runs out the future is dropped, which aborts the
/// in-flight driver call rather than leaving it running in the background.
pub async fn with_deadline<T, E, F>(
    operation: &'static str,
    budget: Duration,
    fut: F,
) -> Result<T, StoreError>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::warn!(
                operation,
                budget_ms = budget.as_millis() as u64,
                "store operation timed out"
            );
            Err(StoreError::Timeout {
                operation,
                after: budget,
            })
        }
    }
}
