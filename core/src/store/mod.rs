//! Persistence seam for todo records.
//!
//! # Design
//! `TodoStore` is deliberately narrow: keyed inserts, lookups and deletes
//! over a single table. The service owns every rule about what a request
//! may do; a store only guarantees that an explicit-id insert never
//! overwrites an existing row and that each mutation is durable once the
//! call returns.

use async_trait::async_trait;

use crate::types::{NewTodo, Todo, TodoPatch};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Faults raised by a `TodoStore` backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An explicit-id insert hit an existing row.
    #[error("id {0} already exists")]
    Conflict(i64),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Every positive id is in use.
    #[error("no unused id left")]
    IdsExhausted,

    /// The blocking task running a query panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(String),

    /// A previous query panicked while holding the connection.
    #[error("store connection lock poisoned")]
    Poisoned,
}

/// Key-ordered table of todo records.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Inserts a record. With `id: None` the store allocates one past the
    /// highest id, or an unused positive id once `i64::MAX` is taken; with
    /// an explicit id the insert fails with `StoreError::Conflict` if
    /// the id is in use.
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Todo>>;

    /// All records in ascending id order.
    async fn list_all(&self) -> StoreResult<Vec<Todo>>;

    /// Overwrites only the fields `patch` carries on record `id`, in one
    /// write, and returns the resulting row. `None` if no such record exists.
    async fn update(&self, id: i64, patch: &TodoPatch) -> StoreResult<Option<Todo>>;

    /// Returns `false` if no such record exists.
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;

    /// Removes every record one at a time and returns how many were removed.
    async fn delete_all(&self) -> StoreResult<usize>;
}
