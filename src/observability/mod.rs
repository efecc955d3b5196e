//! Observability for the todo API
//!
//! Handlers log through `tracing` macros; request spans come from
//! `tower_http::trace::TraceLayer`. This module only installs the
//! subscriber.

mod logging;

pub use logging::{env_filter, init_logging, DEFAULT_FILTER};
