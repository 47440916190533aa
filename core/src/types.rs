//! Domain DTOs for the todo service.
//!
//! # Design
//! `TodoId` wraps a MongoDB ObjectId but serializes as its 24-character hex
//! form, so JSON clients see `"_id": "65f0..."` instead of the extended-JSON
//! `{"$oid": ...}` shape. The store's own document type lives next to the
//! MongoDB adapter; these types are the wire shape of the HTTP API.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Store-generated identifier of a todo record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(ObjectId);

impl TodoId {
    /// Parse a 24-character hex identifier.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| StoreError::InvalidIdentifier(raw.to_string()))
    }

    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for TodoId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for TodoId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TodoId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self {
        id.0.to_hex()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// A single todo record as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Request payload for creating a todo. Any `_id` in the payload is ignored;
/// identifiers are always assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewTodo {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

/// Acknowledgement of a successful insert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub inserted_id: TodoId,
}

/// Outcome of a delete-by-id. `deleted_count` is 0 when nothing matched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "65f1a2b3c4d5e6f708192a3b";

    #[test]
    fn parses_24_hex_characters() {
        let id = TodoId::parse(HEX).unwrap();
        assert_eq!(id.to_string(), HEX);
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for raw in ["", "not-an-id", "65f1a2b3", "zzf1a2b3c4d5e6f708192a3b"] {
            match TodoId::parse(raw) {
                Err(StoreError::InvalidIdentifier(rejected)) => assert_eq!(rejected, raw),
                other => panic!("expected InvalidIdentifier for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn todo_serializes_id_as_underscore_hex() {
        let todo = Todo {
            id: TodoId::parse(HEX).unwrap(),
            content: Some("buy milk".to_string()),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["_id"], HEX);
        assert_eq!(json["content"], "buy milk");
    }

    #[test]
    fn todo_omits_absent_content() {
        let todo = Todo {
            id: TodoId::generate(),
            content: None,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("content").is_none());
    }

    #[test]
    fn new_todo_ignores_unknown_fields_and_id() {
        let input: NewTodo =
            serde_json::from_str(&format!(r#"{{"_id":"{HEX}","content":"x","extra":1}}"#)).unwrap();
        assert_eq!(input, NewTodo::new("x"));
    }

    #[test]
    fn new_todo_content_is_optional() {
        let input: NewTodo = serde_json::from_str("{}").unwrap();
        assert!(input.content.is_none());
    }

    #[test]
    fn acks_use_camel_case_keys() {
        let id = TodoId::parse(HEX).unwrap();
        let insert = serde_json::to_value(InsertAck { inserted_id: id }).unwrap();
        assert_eq!(insert["insertedId"], HEX);

        let delete = serde_json::to_value(DeleteAck { deleted_count: 1 }).unwrap();
        assert_eq!(delete["deletedCount"], 1);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TodoId::generate(), TodoId::generate());
    }
}
