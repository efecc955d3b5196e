//! # HTTP Server
//!
//! Combines the todo and health routers with the shared middleware stack:
//! pre-flight handling, panic recovery, request tracing and CORS headers.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::config::ServerConfig;
use super::cors::{preflight, with_cors_headers};
use super::health_routes::health_routes;
use super::todo_routes::todo_routes;
use crate::rest_api::{ErrorResponse, RestError, TodoHandler};
use crate::store::{InMemoryTodoStore, TodoStore};

/// HTTP server for the todo API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over an in-process store named after `config.table_name`
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(InMemoryTodoStore::new(config.table_name.clone()));
        Self::with_store(config, store)
    }

    /// Create a server over the given store
    pub fn with_store<S: TodoStore + 'static>(config: ServerConfig, store: Arc<S>) -> Self {
        let handler = TodoHandler::new(store).with_limits(config.limits());
        Self::with_handler(config, handler)
    }

    /// Create a server over a fully configured handler
    pub fn with_handler<S: TodoStore + 'static>(config: ServerConfig, handler: TodoHandler<S>) -> Self {
        let router = build_router(Arc::new(handler));
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            table = %self.config.table_name,
            "Todo API listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Todo API stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router<S: TodoStore + 'static>(handler: Arc<TodoHandler<S>>) -> Router {
    let router = Router::new()
        .merge(health_routes(handler.clone()))
        .merge(todo_routes(handler))
        .fallback(route_not_found)
        .layer(middleware::from_fn(preflight))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    with_cors_headers(router)
}

async fn route_not_found() -> impl IntoResponse {
    let body = ErrorResponse {
        error: "Route not found".to_string(),
        code: StatusCode::NOT_FOUND.as_u16(),
        message: None,
        id: None,
        invalid_fields: None,
    };
    (StatusCode::NOT_FOUND, Json(body))
}

/// Known path, unsupported method
pub(super) async fn method_not_allowed() -> RestError {
    RestError::MethodNotAllowed
}

/// Turn a handler panic into a 500 with the panic text as detail
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(error = %detail, "Handler panicked");
    RestError::Internal(detail).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
