//! # Todo API CLI
//!
//! `serve` starts the HTTP server; `config` prints the resolved settings.
//! Errors are returned to `main`, which prints them and exits non-zero.

pub mod args;
pub mod commands;
pub mod errors;

pub use args::{Cli, Command};
pub use commands::{resolve_config, run, run_command, Overrides};
pub use errors::{CliError, CliErrorCode, CliResult};
