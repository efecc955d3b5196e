//! # Todo HTTP Server Module
//!
//! Axum server exposing the todo API.
//!
//! # Endpoints
//!
//! - `GET /health` - Store connectivity check
//! - `POST /todos`, `GET /todos` - Create and list
//! - `GET|PUT|DELETE /todos/:id` - Read, update and delete
//! - `POST|DELETE /todos/bulk` - Bulk create and bulk delete
//! - `OPTIONS *` - Empty pre-flight response

pub mod config;
pub mod cors;
pub mod health_routes;
pub mod server;
pub mod todo_routes;

pub use config::{ConfigError, ServerConfig};
pub use server::{build_router, HttpServer};
