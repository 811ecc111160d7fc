//! CLI command implementations.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::client::ConnectionState;
use crate::config::{ConfigurationValidator, ServerSettings};
use crate::jsonrpc::{TransportConfig, LOGOUT};
use crate::server::start_server;

use super::utils::{attach_token, load_request_params, load_server_settings};

/// Start the CivicAlert JSON-RPC server
pub async fn serve(
    transport: Option<String>,
    socket_path: Option<String>,
    config_path: Option<PathBuf>,
    config_json: Option<String>,
) -> Result<()> {
    info!("Loading configuration...");
    let mut settings = load_server_settings(config_path, config_json)?;

    if let Some(transport) = transport {
        settings.server.transport = transport;
    }
    if let Some(socket_path) = socket_path {
        settings.server.socket_path = Some(socket_path);
    }

    let transport_config = TransportConfig::from_settings(&settings)?;
    info!("Server starting with {} transport", transport_config.description());

    start_server(Arc::new(settings), Some(transport_config)).await?;

    info!("CivicAlert server stopped");
    Ok(())
}

/// Remember a CivicAlert server's Unix socket
pub async fn connect(socket_path: String) -> Result<()> {
    let client = crate::client::JsonRpcClient::new(socket_path.clone());
    if !client.validate_connection().await? {
        anyhow::bail!("Failed to connect to server at: {}", socket_path);
    }

    ConnectionState::default_location()?.save_socket(&socket_path)?;

    println!("✓ Connected to CivicAlert server at: {}", socket_path);
    println!("  Use 'civicalert login' to open a staff session.");
    Ok(())
}

/// Forget the current server and token
pub async fn disconnect() -> Result<()> {
    let state = ConnectionState::default_location()?;
    match state.socket()? {
        Some(socket_path) => {
            state.clear()?;
            println!("✓ Disconnected from: {}", socket_path);
        }
        None => println!("Not currently connected to any server."),
    }
    Ok(())
}

/// Log in as staff and save the returned token
pub async fn login(username: String, password: String, socket_path: Option<String>) -> Result<()> {
    let state = ConnectionState::default_location()?;
    let client = state.client(socket_path)?;

    let result = client.login(&username, &password).await?;
    let token = result
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Login response did not contain a token"))?;
    state.save_token(token)?;

    let role = result["user"]["role"].as_str().unwrap_or("unknown");
    let expires_at = result["expiresAt"].as_str().unwrap_or("unknown");
    println!("✓ Logged in as {} ({})", username, role);
    println!("  Session expires at {}", expires_at);
    Ok(())
}

/// Revoke and forget the saved token
pub async fn logout(socket_path: Option<String>) -> Result<()> {
    let state = ConnectionState::default_location()?;
    let Some(token) = state.token()? else {
        println!("No saved staff session.");
        return Ok(());
    };

    let client = state.client(socket_path)?;
    let result = client.call(LOGOUT, serde_json::json!({ "token": token })).await;
    state.clear_token()?;

    match result {
        Ok(_) => println!("✓ Logged out"),
        Err(e) => error!("Server did not confirm logout: {}", e),
    }
    Ok(())
}

/// Call an arbitrary method and print the JSON result
pub async fn call(
    method: String,
    params_file: Option<PathBuf>,
    params_json: Option<String>,
    token: Option<String>,
    socket_path: Option<String>,
) -> Result<()> {
    let state = ConnectionState::default_location()?;
    let token = match token {
        Some(token) => Some(token),
        None => state.token()?,
    };

    let params = load_request_params(params_file, params_json)?;
    let params = attach_token(&method, params, token)?;

    let client = state.client(socket_path)?;
    info!("Calling {} via {}", method, client.socket_path());

    let result = client.call(&method, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Initialize default configuration
pub async fn init(force: bool) -> Result<()> {
    let config_path = ServerSettings::config_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_content = toml::to_string_pretty(&ServerSettings::default())?;
    std::fs::write(&config_path, toml_content)?;

    println!("✓ Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Show or validate the resolved configuration
pub async fn config(
    config_path: Option<PathBuf>,
    show: bool,
    validate: bool,
    strict: bool,
) -> Result<()> {
    let settings = ServerSettings::load_with_precedence(None, config_path.as_deref())?.settings;

    if show {
        println!("{}", toml::to_string_pretty(&settings)?);
    }

    if validate {
        let mut validator = ConfigurationValidator::new(strict);
        match validator.validate_settings(&settings) {
            Ok(()) => println!(
                "✓ Configuration is valid ({} warnings)",
                validator.warnings().len()
            ),
            Err(e) => {
                for problem in validator.errors().iter().chain(validator.warnings()) {
                    eprintln!("  - {}", problem);
                }
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Show version information
pub async fn version() -> Result<()> {
    println!("CivicAlert {}", env!("CARGO_PKG_VERSION"));
    println!("Built with Rust {}", rustc_version::version()?);
    Ok(())
}
