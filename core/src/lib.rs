//! Record store for the todo service.
//!
//! # Overview
//! Wraps a single MongoDB collection behind the `TodoStore` trait with three
//! operations: list every record, insert one, delete one by id. The HTTP
//! layer only ever sees the trait, so it can be driven by `MemoryStore` in
//! tests and by `MongoStore` in production.
//!
//! # Design
//! - Each MongoDB call runs under `with_deadline`, which drops (and thereby
//!   aborts) the driver future once the budget is spent.
//! - Malformed identifiers are rejected while parsing a `TodoId`, so stores
//!   only ever see well-formed ids.

pub mod error;
pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use mongo::{MongoConfig, MongoStore};
pub use store::{with_deadline, SharedStore, TodoStore};
pub use types::{DeleteAck, InsertAck, NewTodo, Todo, TodoId};
