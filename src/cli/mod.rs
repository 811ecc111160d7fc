//! CLI interface for CivicAlert.
//!
//! This module provides the command-line interface for both server and client operations.

mod commands;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;
pub use utils::*;

#[derive(Parser, Debug)]
#[command(name = "civicalert")]
#[command(about = "Citizen incident reporting and triage server speaking JSON-RPC")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CIVICALERT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the JSON-RPC server
    Serve {
        /// Transport: stdio or socket (defaults to the configured one)
        #[arg(long, short = 't')]
        transport: Option<String>,

        /// Unix socket path (used when transport = "socket")
        #[arg(long, short = 's')]
        socket_path: Option<String>,

        /// Path to a custom configuration file (TOML format)
        #[arg(long, short = 'c', conflicts_with = "config_json")]
        config_path: Option<PathBuf>,

        /// Inline JSON configuration (overrides file-based config)
        #[arg(long, short = 'j', conflicts_with = "config_path")]
        config_json: Option<String>,
    },

    /// Remember a running server's Unix socket for later commands
    Connect { socket_path: String },

    /// Forget the saved server and staff token
    Disconnect,

    /// Log in as staff and save the session token
    Login {
        #[arg(long, short = 'u')]
        username: String,

        #[arg(long, short = 'p', env = "CIVICALERT_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, short = 's')]
        socket_path: Option<String>,
    },

    /// Revoke the saved staff token
    Logout {
        #[arg(long, short = 's')]
        socket_path: Option<String>,
    },

    /// Call a JSON-RPC method on a running server
    Call {
        /// Method name, e.g. civicalert/incident/list
        method: String,

        #[arg(long, short = 'p', conflicts_with = "params_json")]
        params_file: Option<PathBuf>,

        #[arg(long, short = 'j', conflicts_with = "params_file")]
        params_json: Option<String>,

        /// Staff token; defaults to the one saved by `login`
        #[arg(long)]
        token: Option<String>,

        #[arg(long, short = 's')]
        socket_path: Option<String>,
    },

    /// Initialize default configuration at default location
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[arg(long)]
        show: bool,

        #[arg(long)]
        validate: bool,

        /// Treat warnings as errors when validating
        #[arg(long, requires = "validate")]
        strict: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                transport,
                socket_path,
                config_path,
                config_json,
            } => serve(transport, socket_path, config_path.or(self.config), config_json).await,

            Commands::Connect { socket_path } => connect(socket_path).await,
            Commands::Disconnect => disconnect().await,

            Commands::Login {
                username,
                password,
                socket_path,
            } => login(username, password, socket_path).await,
            Commands::Logout { socket_path } => logout(socket_path).await,

            Commands::Call {
                method,
                params_file,
                params_json,
                token,
                socket_path,
            } => call(method, params_file, params_json, token, socket_path).await,

            Commands::Init { force } => init(force).await,
            Commands::Config {
                show,
                validate,
                strict,
            } => config(self.config, show, validate, strict).await,

            Commands::Version => version().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from([
            "civicalert",
            "--log-level",
            "debug",
            "call",
            "civicalert/incident/get",
            "-j",
            r#"{"id":"INC-000001"}"#,
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Call {
                method, params_json, ..
            } => {
                assert_eq!(method, "civicalert/incident/get");
                assert!(params_json.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_rejects_two_config_sources() {
        let result = Cli::try_parse_from([
            "civicalert",
            "serve",
            "--config-path",
            "a.toml",
            "--config-json",
            "{}",
        ]);
        assert!(result.is_err());
    }
}
