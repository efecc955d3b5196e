//! Todo HTTP Routes
//!
//! Thin axum adapters: extract path, query and raw body, call the
//! `TodoHandler`, and pick the status code.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::server::method_not_allowed;
use crate::rest_api::parser::parse_body;
use crate::rest_api::{ListResponse, RestError, TodoHandler};
use crate::store::TodoStore;
use crate::todo::Todo;

/// Shared state type
type TodoState<S> = Arc<TodoHandler<S>>;

/// Todo routes with shared state
pub fn todo_routes<S: TodoStore + 'static>(handler: TodoState<S>) -> Router {
    Router::new()
        .route(
            "/todos",
            get(list_handler::<S>)
                .post(create_handler::<S>)
                .put(missing_id_handler)
                .delete(missing_id_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/todos/bulk",
            post(bulk_create_handler::<S>)
                .delete(bulk_delete_handler::<S>)
                .fallback(method_not_allowed),
        )
        .route(
            "/todos/:id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>)
                .fallback(method_not_allowed),
        )
        .with_state(handler)
}

/// POST /todos
async fn create_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), RestError> {
    let body = parse_body(&body)?;
    let todo = handler.create(body.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos
async fn list_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, RestError> {
    let result = handler.list(&query).await?;
    Ok(Json(result))
}

/// GET /todos/:id
async fn get_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Todo>, RestError> {
    let id = path_id(id)?;
    let todo = handler.get(&id).await?;
    Ok(Json(todo))
}

/// PUT /todos/:id
async fn update_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Todo>, RestError> {
    let id = path_id(id)?;
    let body = parse_body(&body)?;
    let todo = handler.update(Some(id.as_str()), body.as_ref()).await?;
    Ok(Json(todo))
}

/// DELETE /todos/:id
async fn delete_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Todo>, RestError> {
    let id = path_id(id)?;
    let todo = handler.delete(Some(id.as_str())).await?;
    Ok(Json(todo))
}

/// Undecodable `:id` segments become a JSON 400
fn path_id(id: Result<Path<String>, PathRejection>) -> Result<String, RestError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| RestError::InvalidPathParam(rejection.body_text()))
}

/// PUT or DELETE on the collection itself
async fn missing_id_handler() -> RestError {
    RestError::MissingId
}

/// POST /todos/bulk
async fn bulk_create_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    body: Bytes,
) -> Result<impl IntoResponse, RestError> {
    let body = parse_body(&body)?;
    let result = handler.bulk_create(body.as_ref()).await?;
    Ok((result.status_code(), Json(result)))
}

/// DELETE /todos/bulk
async fn bulk_delete_handler<S: TodoStore + 'static>(
    State(handler): State<TodoState<S>>,
    body: Bytes,
) -> Result<impl IntoResponse, RestError> {
    let body = parse_body(&body)?;
    let result = handler.bulk_delete(body.as_ref()).await?;
    Ok((result.status_code(), Json(result)))
}
