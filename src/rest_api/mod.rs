//! # Todo REST API Module
//!
//! Request parsing, the todo handlers, and the mapping of their outcomes to
//! HTTP status codes and JSON bodies.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod response;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::TodoHandler;
pub use parser::{Limits, ListParams};
pub use response::{
    BulkCreateResponse, BulkDeleteResponse, HealthResponse, HealthStatus, ListResponse,
};
