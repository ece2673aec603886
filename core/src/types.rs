//! Domain types for the todo resource.
//!
//! # Design
//! `Todo` is the stored record and the only shape the service ever
//! serializes. Incoming payloads land in `TodoArgs`, where every key is
//! optional so that validation (not deserialization) decides which field is
//! missing and can name it. Validation turns `TodoArgs` into either a
//! `NewTodo` (create) or a `TodoPatch` (update) before any store access.

use serde::{Deserialize, Serialize};

use crate::error::TodoError;

/// Upper bound on `title` and `body`, in characters.
pub const MAX_FIELD_LEN: usize = 50;

/// A single todo record as stored and as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Raw request payload for create and update, accepted from JSON or form
/// bodies. `id` is only honoured on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoArgs {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl TodoArgs {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Fills every key missing here from `fallback`, e.g. body values over
    /// query-string values.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            id: self.id.or(fallback.id),
            title: self.title.or(fallback.title),
            body: self.body.or(fallback.body),
        }
    }
}

/// A validated insert. `id: None` lets the store allocate the next id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub id: Option<i64>,
    pub title: String,
    pub body: String,
}

impl NewTodo {
    pub fn into_todo(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            body: self.body,
        }
    }
}

impl TryFrom<TodoArgs> for NewTodo {
    type Error = TodoError;

    /// `title` is checked before `body`, so a payload missing both reports
    /// the title.
    fn try_from(args: TodoArgs) -> Result<Self, Self::Error> {
        let title = required(Field::Title, args.title)?;
        let body = required(Field::Body, args.body)?;
        if let Some(id) = args.id {
            if id < 1 {
                return Err(TodoError::invalid(Field::Id, "Id must be a positive integer"));
            }
        }
        Ok(Self {
            id: args.id,
            title,
            body,
        })
    }
}

/// A validated partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

impl TryFrom<TodoArgs> for TodoPatch {
    type Error = TodoError;

    /// Empty strings count as absent, matching how a blank form field is
    /// submitted.
    fn try_from(args: TodoArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            title: optional(Field::Title, args.title)?,
            body: optional(Field::Body, args.body)?,
        })
    }
}

/// Confirmation body returned by the delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload fields that validation can complain about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Body,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Body => "body",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Title => "Title",
            Self::Body => "Body",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn required(field: Field, value: Option<String>) -> Result<String, TodoError> {
    let value =
        value.ok_or_else(|| TodoError::missing(field, format!("{} is required", field.label())))?;
    if value.is_empty() {
        return Err(TodoError::invalid(field, format!("{} cannot be empty", field.label())));
    }
    check_len(field, &value)?;
    Ok(value)
}

fn optional(field: Field, value: Option<String>) -> Result<Option<String>, TodoError> {
    match value {
        Some(value) if !value.is_empty() => {
            check_len(field, &value)?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}

fn check_len(field: Field, value: &str) -> Result<(), TodoError> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(TodoError::invalid(
            field,
            format!("{} must be at most {MAX_FIELD_LEN} characters", field.label()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_fixed_schema() {
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            body: "Body".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "title": "Test", "body": "Body"}));
    }

    #[test]
    fn args_all_fields_optional() {
        let args: TodoArgs = serde_json::from_str("{}").unwrap();
        assert!(args.id.is_none());
        assert!(args.title.is_none());
        assert!(args.body.is_none());
    }

    #[test]
    fn args_reject_non_string_title() {
        let result: Result<TodoArgs, _> = serde_json::from_str(r#"{"title": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn or_prefers_own_values() {
        let body = TodoArgs {
            title: Some("from body".to_string()),
            ..TodoArgs::default()
        };
        let merged = body.or(TodoArgs::new("from query", "B").with_id(3));
        assert_eq!(merged.title.as_deref(), Some("from body"));
        assert_eq!(merged.body.as_deref(), Some("B"));
        assert_eq!(merged.id, Some(3));
    }

    #[test]
    fn new_todo_requires_title_first() {
        let err = NewTodo::try_from(TodoArgs::default()).unwrap_err();
        assert_eq!(err.field(), Some(Field::Title));
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn new_todo_names_missing_body() {
        let args = TodoArgs {
            title: Some("T".to_string()),
            ..TodoArgs::default()
        };
        let err = NewTodo::try_from(args).unwrap_err();
        assert_eq!(err.field(), Some(Field::Body));
        assert_eq!(err.to_string(), "Body is required");
    }

    #[test]
    fn new_todo_rejects_empty_title() {
        let err = NewTodo::try_from(TodoArgs::new("", "B")).unwrap_err();
        assert_eq!(err.to_string(), "Title cannot be empty");
    }

    #[test]
    fn new_todo_rejects_overlong_body() {
        let err = NewTodo::try_from(TodoArgs::new("T", "x".repeat(51))).unwrap_err();
        assert_eq!(err.field(), Some(Field::Body));
        assert_eq!(err.to_string(), "Body must be at most 50 characters");
    }

    #[test]
    fn new_todo_counts_characters_not_bytes() {
        let todo = NewTodo::try_from(TodoArgs::new("é".repeat(50), "B")).unwrap();
        assert_eq!(todo.title.chars().count(), 50);
    }

    #[test]
    fn new_todo_rejects_non_positive_id() {
        let err = NewTodo::try_from(TodoArgs::new("T", "B").with_id(0)).unwrap_err();
        assert_eq!(err.field(), Some(Field::Id));
    }

    #[test]
    fn patch_ignores_empty_fields() {
        let args = TodoArgs {
            title: Some(String::new()),
            body: Some("C".to_string()),
            ..TodoArgs::default()
        };
        let patch = TodoPatch::try_from(args).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.body.as_deref(), Some("C"));
    }
}
