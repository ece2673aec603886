use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{error, info};

use super::{StoreError, StoreResult, TodoStore};
use crate::types::{NewTodo, Todo, TodoPatch};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todo_model (
    id INTEGER NOT NULL PRIMARY KEY,
    title VARCHAR(50) NOT NULL,
    body VARCHAR(50) NOT NULL
);";

const TODO_SELECT_SQL: &str = "SELECT id, title, body FROM todo_model";

/// SQLite-backed store over the `todo_model` table.
///
/// The connection runs in autocommit mode, so every statement is committed
/// before the call returns. Queries run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the table exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let store = Connection::open(path)
            .map_err(StoreError::from)
            .and_then(Self::bootstrap);
        match &store {
            Ok(_) => info!(
                path = %path.display(),
                duration = ?started_at.elapsed(),
                "opened sqlite store"
            ),
            Err(err) => error!(path = %path.display(), error = %err, "failed to open sqlite store"),
        }
        store
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        self.with_conn(move |conn| {
            let id = match todo.id {
                Some(id) => {
                    conn.execute(
                        "INSERT INTO todo_model (id, title, body) VALUES (?1, ?2, ?3);",
                        params![id, todo.title, todo.body],
                    )
                    .map_err(|err| conflict_or(err, id))?;
                    id
                }
                None => {
                    conn.execute(
                        "INSERT INTO todo_model (title, body) VALUES (?1, ?2);",
                        params![todo.title, todo.body],
                    )?;
                    conn.last_insert_rowid()
                }
            };
            Ok(todo.into_todo(id))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        self.with_conn(move |conn| {
            let todo = conn
                .query_row(
                    &format!("{TODO_SELECT_SQL} WHERE id = ?1;"),
                    params![id],
                    parse_todo_row,
                )
                .optional()?;
            Ok(todo)
        })
        .await
    }

    async fn list_all(&self) -> StoreResult<Vec<Todo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
            let todos = stmt
                .query_map([], parse_todo_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(todos)
        })
        .await
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> StoreResult<Option<Todo>> {
        let patch = patch.clone();
        self.with_conn(move |conn| {
            let todo = conn
                .query_row(
                    "UPDATE todo_model
                     SET
                        title = COALESCE(?1, title),
                        body = COALESCE(?2, body)
                     WHERE id = ?3
                     RETURNING id, title, body;",
                    params![patch.title, patch.body, id],
                    parse_todo_row,
                )
                .optional()?;
            Ok(todo)
        })
        .await
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM todo_model WHERE id = ?1;", params![id])?;
            Ok(changed > 0)
        })
        .await
    }

    async fn delete_all(&self) -> StoreResult<usize> {
        self.with_conn(|conn| {
            let ids = {
                let mut stmt = conn.prepare("SELECT id FROM todo_model ORDER BY id ASC;")?;
                let ids = stmt
                    .query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                ids
            };
            let mut removed = 0;
            for id in ids {
                removed += conn.execute("DELETE FROM todo_model WHERE id = ?1;", params![id])?;
            }
            Ok(removed)
        })
        .await
    }
}

fn parse_todo_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
    })
}

fn conflict_or(err: rusqlite::Error, id: i64) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY {
            return StoreError::Conflict(id);
        }
    }
    StoreError::Sqlite(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(id: Option<i64>, title: &str) -> NewTodo {
        NewTodo {
            id,
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn auto_ids_start_at_one() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.insert(new_todo(None, "a")).await.unwrap();
        let second = store.insert(new_todo(None, "b")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn primary_key_violation_maps_to_conflict() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(new_todo(Some(5), "first")).await.unwrap();
        let err = store.insert(new_todo(Some(5), "second")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(5)));
        let kept = store.find_by_id(5).await.unwrap().unwrap();
        assert_eq!(kept.title, "first");
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let store = SqliteStore::open(&path).unwrap();
        let created = store.insert(new_todo(None, "durable")).await.unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        let loaded = reopened.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn auto_id_after_max_id_is_positive() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(new_todo(Some(i64::MAX), "max")).await.unwrap();
        let next = store.insert(new_todo(None, "auto")).await.unwrap();
        assert!(next.id > 0 && next.id != i64::MAX);
    }

    #[tokio::test]
    async fn update_returns_patched_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        let created = store.insert(new_todo(None, "A")).await.unwrap();
        let patch = TodoPatch {
            title: None,
            body: Some("C".to_string()),
        };
        let updated = store.update(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.body, "C");
        assert!(store.update(99, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_reports_removed_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        for title in ["a", "b", "c"] {
            store.insert(new_todo(None, title)).await.unwrap();
        }
        assert_eq!(store.delete_all().await.unwrap(), 3);
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
