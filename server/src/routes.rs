//! The three todo endpoints.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::routing::{delete, get};
use axum::{Json, Router};
use todo_core::{DeleteAck, InsertAck, NewTodo, SharedStore, Todo, TodoId};

use crate::error::ApiError;

pub fn router() -> Router<SharedStore> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", delete(delete_todo))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(no_route)
}

/// GET /todos
async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(store.list().await?))
}

/// POST /todos
///
/// The body is decoded as JSON whatever the request's content-type says.
async fn create_todo(
    State(store): State<SharedStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<InsertAck>, ApiError> {
    let input: NewTodo = serde_json::from_slice(&body?)?;
    let ack = store.insert(input).await?;
    tracing::info!(id = %ack.inserted_id, "created todo");
    Ok(Json(ack))
}

/// DELETE /todos/{id}
async fn delete_todo(
    State(store): State<SharedStore>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteAck>, ApiError> {
    let Path(id) = id?;
    let id = TodoId::parse(&id)?;
    let ack = store.delete(&id).await?;
    tracing::info!(%id, deleted = ack.deleted_count, "deleted todo");
    Ok(Json(ack))
}

async fn no_route(uri: Uri) -> ApiError {
    ApiError::Rejected {
        status: StatusCode::NOT_FOUND,
        message: format!("no route for {}", uri.path()),
    }
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: format!("{method} is not allowed on {}", uri.path()),
    }
}
