//! Server configuration from flags and environment.
//!
//! `DATABASE_URI` is the only required setting. It is never logged, since
//! it usually embeds credentials.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use todo_core::MongoConfig;

#[derive(Clone, Parser)]
#[command(name = "todo-server", version, about = "JSON todo service backed by MongoDB")]
pub struct ServerConfig {
    /// MongoDB connection string (mongodb:// or mongodb+srv://)
    #[arg(long, env = "DATABASE_URI", hide_env_values = true)]
    pub database_uri: String,

    /// Database holding the todo collection
    #[arg(long, env = "TODO_DATABASE", default_value = todo_core::mongo::DEFAULT_DATABASE)]
    pub database: String,

    /// Collection holding the todo records
    #[arg(long, env = "TODO_COLLECTION", default_value = todo_core::mongo::DEFAULT_COLLECTION)]
    pub collection: String,

    /// Address to bind to
    #[arg(long, short = 'b', env = "TODO_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Time budget for each database call, in seconds
    #[arg(long, env = "TODO_STORE_TIMEOUT_SECS", default_value_t = 10)]
    pub store_timeout_secs: u64,

    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URI is empty")]
    EmptyUri,

    #[error("DATABASE_URI must start with mongodb:// or mongodb+srv://")]
    UnsupportedScheme,

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("store timeout must be at least one second")]
    ZeroTimeout,
}

impl ServerConfig {
    /// Reject settings that would only fail later, on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let uri = self.database_uri.trim();
        if uri.is_empty() {
            return Err(ConfigError::EmptyUri);
        }
        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(ConfigError::UnsupportedScheme);
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::EmptyName("database"));
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyName("collection"));
        }
        if self.store_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn mongo_config(&self) -> MongoConfig {
        MongoConfig {
            uri: self.database_uri.trim().to_string(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            timeout: self.store_timeout(),
        }
    }
}
