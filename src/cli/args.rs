//! CLI argument definitions using clap
//!
//! Commands:
//! - todo-api serve [--config <path>] [--host <host>] [--port <port>] [--table <name>]
//! - todo-api config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// todo-api - a validated CRUD API for todo records
#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Backing table name (overrides TODO_TABLE_NAME)
        #[arg(long)]
        table: Option<String>,
    },

    /// Print the resolved configuration and exit
    Config {
        /// Path to JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
