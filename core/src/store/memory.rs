use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TodoStore};
use crate::types::{NewTodo, Todo, TodoPatch};

/// In-process store. Nothing survives a restart.
///
/// Ids are allocated as one past the highest id present, the same rule
/// SQLite applies to an `INTEGER PRIMARY KEY`. Once `i64::MAX` is taken the
/// lowest unused positive id is handed out instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<BTreeMap<i64, Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let mut rows = self.rows.write().await;
        let id = match todo.id {
            Some(id) if rows.contains_key(&id) => return Err(StoreError::Conflict(id)),
            Some(id) => id,
            None => next_free_id(&rows).ok_or(StoreError::IdsExhausted)?,
        };
        let todo = todo.into_todo(id);
        rows.insert(id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> StoreResult<Option<Todo>> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            row.title.clone_from(title);
        }
        if let Some(body) = &patch.body {
            row.body.clone_from(body);
        }
        Ok(Some(row.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn delete_all(&self) -> StoreResult<usize> {
        let ids: Vec<i64> = self.rows.read().await.keys().copied().collect();
        let mut removed = 0;
        for id in ids {
            if self.rows.write().await.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn next_free_id(rows: &BTreeMap<i64, Todo>) -> Option<i64> {
    match rows.last_key_value() {
        None => Some(1),
        Some((last, _)) => last.checked_add(1).or_else(|| lowest_unused_id(rows)),
    }
}

fn lowest_unused_id(rows: &BTreeMap<i64, Todo>) -> Option<i64> {
    let mut candidate = 1_i64;
    for &id in rows.range(1..).map(|(id, _)| id) {
        if id != candidate {
            break;
        }
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
