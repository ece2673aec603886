//! Request extractors for todo payloads and ids.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form,
};
use todo_core::{error::TODO_NOT_FOUND, TodoArgs};

use crate::error::ApiError;

/// Todo arguments gathered from the query string and the request body.
///
/// The body is read as a form when the client says so, as JSON otherwise.
/// Keys present in the body win over the same keys in the query string. An
/// empty body contributes nothing, so a create without any arguments fails
/// validation on the first required field rather than on parsing.
#[derive(Debug, Clone)]
pub struct TodoPayload(pub TodoArgs);

impl<S> FromRequest<S> for TodoPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TodoArgs>::try_from_uri(req.uri())
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        let Self(body) = Self::from_body(req, state).await?;
        Ok(Self(body.or(query)))
    }
}

impl TodoPayload {
    async fn from_body<S>(req: Request, state: &S) -> Result<Self, ApiError>
    where
        S: Send + Sync,
    {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<TodoArgs>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(TodoArgs::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| ApiError::bad_request(format!("Malformed JSON body: {err}")))
    }
}

/// The integer `{id}` path segment. Anything that is not an integer cannot
/// name a todo, so it is answered with 404.
#[derive(Debug, Clone, Copy)]
pub struct TodoId(pub i64);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found(TODO_NOT_FOUND))?;
        Ok(Self(id))
    }
}
