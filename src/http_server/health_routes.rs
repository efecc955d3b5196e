//! Health HTTP Routes
//!
//! `GET /health` probes the store and reports 200 or 503.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use super::server::method_not_allowed;
use crate::rest_api::TodoHandler;
use crate::store::TodoStore;

/// Health check route
pub fn health_routes<S: TodoStore + 'static>(handler: Arc<TodoHandler<S>>) -> Router {
    Router::new()
        .route(
            "/health",
            get(health_handler::<S>).fallback(method_not_allowed),
        )
        .with_state(handler)
}

/// Health check handler
async fn health_handler<S: TodoStore + 'static>(
    State(handler): State<Arc<TodoHandler<S>>>,
) -> impl IntoResponse {
    let response = handler.health().await;
    (response.status_code(), Json(response))
}
