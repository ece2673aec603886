//! HTTP surface for the todo service.
//!
//! # Routes
//! | Verb   | Path    | Operation    |
//! |--------|---------|--------------|
//! | GET    | `/`     | list         |
//! | POST   | `/`     | create       |
//! | DELETE | `/`     | delete all   |
//! | GET    | `/{id}` | get          |
//! | PUT    | `/{id}` | update       |
//! | DELETE | `/{id}` | delete       |
//!
//! Handlers are thin: they extract the payload, call `TodoService`, and let
//! `ApiError` turn failures into status codes.

use std::future::Future;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;
use todo_core::{Message, Todo, TodoService};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;

pub use config::{Config, ConfigError, Database};
pub use error::ApiError;
pub use extract::{TodoId, TodoPayload};

pub fn app(service: TodoService) -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo).delete(delete_todos))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves `service` on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, service: TodoService, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn list_todos(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(service.list().await?))
}

async fn create_todo(
    State(service): State<TodoService>,
    TodoPayload(args): TodoPayload,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = service.create(args).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn delete_todos(State(service): State<TodoService>) -> Result<Json<Message>, ApiError> {
    Ok(Json(service.delete_all().await?))
}

async fn get_todo(
    State(service): State<TodoService>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(service.get(id).await?))
}

async fn update_todo(
    State(service): State<TodoService>,
    TodoId(id): TodoId,
    TodoPayload(args): TodoPayload,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(service.update(id, args).await?))
}

async fn delete_todo(
    State(service): State<TodoService>,
    TodoId(id): TodoId,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(service.delete(id).await?))
}

async fn unknown_route() -> ApiError {
    ApiError::not_found("The requested URL was not found on the server")
}
