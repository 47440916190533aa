//! MongoDB-backed record store.
//!
//! # Design
//! One `Client` (itself a connection pool) is created at startup and shared
//! by every request through the `Collection` handle. Each operation is
//! wrapped in `with_deadline`; `find` additionally sends the budget to the
//! server as `maxTimeMS` so the query is cut off there too.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;
use crate::store::{with_deadline, TodoStore};
use crate::types::{DeleteAck, InsertAck, NewTodo, Todo, TodoId};

pub const DEFAULT_DATABASE: &str = "Todo";
pub const DEFAULT_COLLECTION: &str = "todos";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the todo collection lives and how long each call may take.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Stored document shape. `_id` is left out on insert so the server assigns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_none"
    )]
    content: Option<String>,
}

/// Documents written by other clients may hold any BSON type under `content`;
/// anything but a string reads as absent instead of failing the whole cursor.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::String(content)) => Some(content),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<TodoDocument>,
    timeout: Duration,
}

impl MongoStore {
    /// Build the client and ping the database so a bad URI or an unreachable
    /// server fails at startup instead of on the first request.
    pub async fn connect(config: MongoConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("todo-server".to_string());
        options.connect_timeout = Some(config.timeout);
        options.server_selection_timeout = Some(config.timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        with_deadline("ping", config.timeout, database.run_command(doc! { "ping": 1 })).await?;
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "connected to MongoDB"
        );

        Ok(Self {
            collection: database.collection(&config.collection),
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let docs = with_deadline("list", self.timeout, async {
            let cursor = self.collection.find(doc! {}).max_time(self.timeout).await?;
            cursor.try_collect::<Vec<TodoDocument>>().await
        })
        .await?;
        tracing::debug!(count = docs.len(), "listed todos");

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id?;
                Some(Todo {
                    id: TodoId::from(id),
                    content: doc.content,
                })
            })
            .collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<InsertAck, StoreError> {
        let document = TodoDocument {
            id: None,
            content: todo.content,
        };
        let result =
            with_deadline("insert", self.timeout, self.collection.insert_one(document)).await?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Unavailable(format!(
                "server assigned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })?;
        tracing::debug!(id = %oid, "inserted todo");
        Ok(InsertAck {
            inserted_id: TodoId::from(oid),
        })
    }

    async fn delete(&self, id: &TodoId) -> Result<DeleteAck, StoreError> {
        let filter = doc! { "_id": id.as_object_id() };
        let result =
            with_deadline("delete", self.timeout, self.collection.delete_one(filter)).await?;
        tracing::debug!(%id, deleted = result.deleted_count, "deleted todo");
        Ok(DeleteAck {
            deleted_count: result.deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_the_service_constants() {
        let config = MongoConfig::new("mongodb://localhost:27017");
        assert_eq!(config.database, "Todo");
        assert_eq!(config.collection, "todos");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn new_document_leaves_id_to_the_server() {
        let document = TodoDocument {
            id: None,
            content: Some("buy milk".to_string()),
        };
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert!(!bson.contains_key("_id"));
        assert_eq!(bson.get_str("content").unwrap(), "buy milk");
    }

    #[test]
    fn non_string_content_reads_as_absent() {
        let id = ObjectId::new();
        for content in [Bson::Int32(42), Bson::Null, Bson::Array(vec![])] {
            let stored = doc! { "_id": id, "content": content };
            let decoded: TodoDocument = mongodb::bson::from_document(stored).unwrap();
            assert_eq!(decoded.id, Some(id));
            assert!(decoded.content.is_none());
        }
    }

    #[test]
    fn string_content_and_missing_content_decode() {
        let decoded: TodoDocument =
            mongodb::bson::from_document(doc! { "_id": ObjectId::new(), "content": "x" }).unwrap();
        assert_eq!(decoded.content.as_deref(), Some("x"));

        let decoded: TodoDocument =
            mongodb::bson::from_document(doc! { "_id": ObjectId::new() }).unwrap();
        assert!(decoded.content.is_none());
    }

    #[tokio::test]
    async fn connect_rejects_a_malformed_uri() {
        let err = MongoStore::connect(MongoConfig::new("http://not-mongo"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "got {err:?}");
    }
}
