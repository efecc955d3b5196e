//! todo-api - a validated CRUD HTTP API for todo records
//!
//! Layers, bottom-up:
//! - `todo`: record model, input validation, record construction
//! - `store`: table abstraction with conditional writes and paged queries
//! - `rest_api`: transport-independent handlers and wire shapes
//! - `http_server`: axum routing, CORS, configuration
//! - `cli`: `serve` and `config` commands

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod store;
pub mod todo;
