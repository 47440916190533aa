//! Error types for the record store.
//!
//! # Design
//! `Timeout` gets its own variant so callers can tell a slow database from a
//! dead one. Every other driver failure (connect, query, cursor, write,
//! document decode) lands in `Unavailable` with the driver's message.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation exceeded its time budget and was aborted.
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The identifier is not a 24-character hex string.
    #[error("invalid identifier {0:?}: expected 24 hex characters")]
    InvalidIdentifier(String),
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::unavailable(err)
    }
}
