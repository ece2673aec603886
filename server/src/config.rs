//! Server configuration from environment variables.
//!
//! | Variable        | Default      | Meaning                              |
//! |-----------------|--------------|--------------------------------------|
//! | `TODO_HOST`     | `127.0.0.1`  | address to bind                      |
//! | `PORT`          | `3000`       | port to bind                         |
//! | `TODO_DATABASE` | `my_api.db`  | SQLite file, or `:memory:` for a     |
//! |                 |              | process-local store                  |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use todo_core::{MemoryStore, SqliteStore, StoreError, TodoService};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "my_api.db";
const MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TODO_HOST `{0}`")]
    InvalidHost(String),

    #[error("invalid PORT `{0}`")]
    InvalidPort(String),
}

/// Where todo records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(PathBuf),
}

impl Database {
    /// Opens the configured store and wraps it in a service.
    pub fn open(&self) -> Result<TodoService, StoreError> {
        match self {
            Self::Memory => Ok(TodoService::new(MemoryStore::new())),
            Self::Sqlite(path) => Ok(TodoService::new(SqliteStore::open(path)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub database: Database,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys take their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host: IpAddr = match get("TODO_HOST") {
            Some(host) => host.trim().parse().map_err(|_| ConfigError::InvalidHost(host))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };
        let port: u16 = match get("PORT") {
            Some(port) => port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };
        let database = match get("TODO_DATABASE") {
            Some(value) if value.trim() == MEMORY_DATABASE => Database::Memory,
            Some(path) => Database::Sqlite(PathBuf::from(path)),
            None => Database::Sqlite(PathBuf::from(DEFAULT_DATABASE)),
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            database,
        })
    }
}
