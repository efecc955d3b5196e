//! CLI command implementations
//!
//! Each command resolves configuration the same way: defaults, then the
//! optional `--config` file, then environment, then flags.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability;

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Execute a specific command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            config,
            host,
            port,
            table,
        } => {
            let overrides = Overrides { host, port, table };
            let config = resolve_config(config.as_deref(), overrides)?;
            serve(config)
        }
        Command::Config { config } => {
            let config = resolve_config(config.as_deref(), Overrides::default())?;
            print_config(&config, &mut io::stdout())
        }
    }
}

/// Command-line settings that win over file and environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub table: Option<String>,
}

impl Overrides {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(table) = self.table {
            config.table_name = table;
        }
        config
    }
}

/// Load, override and validate the configuration
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> CliResult<ServerConfig> {
    let config = overrides.apply(ServerConfig::load(path)?);
    config.validate()?;
    Ok(config)
}

/// Start the HTTP server and block until shutdown
fn serve(config: ServerConfig) -> CliResult<()> {
    observability::init_logging();
    info!(
        table = %config.table_name,
        addr = %config.socket_addr(),
        "Starting todo API"
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create runtime: {}", e)))?;

    let server = HttpServer::new(config);
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(format!("Server error: {}", e)))
}

/// Write the resolved configuration as pretty JSON
fn print_config(config: &ServerConfig, out: &mut impl Write) -> CliResult<()> {
    let json = serde_json::to_string_pretty(config)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"table_name": "from-file", "port": 4100}}"#).unwrap();

        let overrides = Overrides {
            port: Some(5000),
            table: Some("from-flag".to_string()),
            ..Default::default()
        };
        let config = resolve_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.table_name, "from-flag");
    }

    #[test]
    fn test_empty_table_flag_is_rejected() {
        let overrides = Overrides {
            table: Some(" ".to_string()),
            ..Default::default()
        };
        let err = resolve_config(None, overrides).unwrap_err();
        assert_eq!(err.code_str(), "TODO_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = resolve_config(Some(&path), Overrides::default()).unwrap_err();
        assert_eq!(err.code_str(), "TODO_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_print_config_is_json() {
        let config = ServerConfig::with_port(4000);
        let mut out = Vec::new();
        print_config(&config, &mut out).unwrap();

        let parsed: ServerConfig = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, config);
    }
}
