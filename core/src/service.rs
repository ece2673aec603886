//! The six todo operations, independent of any transport.
//!
//! # Design
//! `TodoService` holds only a shared handle to a `TodoStore`, so it is cheap
//! to clone into every request handler. Each operation validates its input
//! before touching the store and reports failures as `TodoError`, which
//! already carries the HTTP status the caller should answer with.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{TodoError, NO_TODO_FOUND, TODO_NOT_FOUND};
use crate::store::{MemoryStore, TodoStore};
use crate::types::{Message, NewTodo, Todo, TodoArgs, TodoPatch};

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl std::fmt::Debug for TodoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoService").finish_non_exhaustive()
    }
}

impl TodoService {
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A service over a fresh `MemoryStore`.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// All records in id order. An empty collection is reported as
    /// `NotFound`, not as an empty list.
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.store.list_all().await?;
        if todos.is_empty() {
            debug!("list on empty collection");
            return Err(TodoError::NotFound(NO_TODO_FOUND));
        }
        Ok(todos)
    }

    /// Validates `args` and inserts the record. An explicit `id` that is
    /// already in use fails with `Conflict` and leaves the stored row as is.
    pub async fn create(&self, args: TodoArgs) -> Result<Todo, TodoError> {
        let new_todo = NewTodo::try_from(args)
            .inspect_err(|err| debug!(error = %err, "rejected create"))?;
        let todo = self
            .store
            .insert(new_todo)
            .await
            .inspect_err(|err| debug!(error = %err, "insert failed"))?;
        info!(id = todo.id, "created todo");
        Ok(todo)
    }

    pub async fn get(&self, id: i64) -> Result<Todo, TodoError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(TODO_NOT_FOUND))
    }

    /// Overwrites the non-empty fields of `args` on record `id` and leaves
    /// the others as stored. A payload with no usable fields returns the
    /// record unchanged.
    pub async fn update(&self, id: i64, args: TodoArgs) -> Result<Todo, TodoError> {
        let patch = TodoPatch::try_from(args)?;
        if patch.is_empty() {
            return self.get(id).await;
        }
        let updated = self
            .store
            .update(id, &patch)
            .await?
            .ok_or(TodoError::NotFound(TODO_NOT_FOUND))?;
        info!(id, "updated todo");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<Message, TodoError> {
        if !self.store.delete_by_id(id).await? {
            return Err(TodoError::NotFound(TODO_NOT_FOUND));
        }
        info!(id, "deleted todo");
        Ok(Message::new("Todo has been deleted"))
    }

    /// Removes every record. Clearing an already empty collection is
    /// `NotFound` rather than a vacuous success.
    pub async fn delete_all(&self) -> Result<Message, TodoError> {
        let removed = self.store.delete_all().await?;
        if removed == 0 {
            return Err(TodoError::NotFound(NO_TODO_FOUND));
        }
        info!(removed, "cleared todos");
        Ok(Message::new("Todos cleared"))
    }
}
