//! Domain, persistence and operations for a single-table todo service.
//!
//! # Overview
//! `TodoService` implements list, create, get, update, delete and clear
//! over any `TodoStore`. Transport crates translate HTTP requests into
//! service calls and `TodoError` back into status codes.
//!
//! # Design
//! - The store is injected, never global: `MemoryStore` for tests and
//!   throwaway runs, `SqliteStore` for a durable file.
//! - Validation happens in `types` before any store access.
//! - `TodoError::status_code` is the single source of HTTP semantics.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::TodoError;
pub use service::TodoService;
pub use store::{MemoryStore, SqliteStore, StoreError, TodoStore};
pub use types::{Field, Message, NewTodo, Todo, TodoArgs, TodoPatch, MAX_FIELD_LEN};
