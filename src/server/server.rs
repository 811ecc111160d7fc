//! CivicAlert JSON-RPC server wiring: settings to store, service, handlers
//! and transport.

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::UnixListener;
use tracing::{debug, info, warn};

use crate::auth::{CredentialTable, SessionManager};
use crate::config::ServerSettings;
use crate::domain::IncidentService;
use crate::handlers::HandlerContext;
use crate::jsonrpc::{create_civicalert_server, StdioTransport, TransportConfig};
use crate::store::{seed, InMemoryIncidentStore};

/// Build the shared handler state, seeding demo incidents when configured
pub fn build_context(settings: &ServerSettings) -> Result<HandlerContext> {
    let session_ttl = settings.session_ttl()?;
    let demo_count = settings.store.demo_incidents;
    let store = if demo_count > 0 {
        let incidents = seed::demo_incidents(&mut rand::rng(), demo_count);
        info!("Seeded {} demo incidents", incidents.len());
        InMemoryIncidentStore::with_incidents(incidents)
    } else {
        InMemoryIncidentStore::new()
    };

    Ok(HandlerContext {
        incidents: Arc::new(IncidentService::new(Arc::new(store))),
        sessions: Arc::new(SessionManager::new(session_ttl)),
        credentials: Arc::new(CredentialTable::default()),
    })
}

/// Create and run the server until the transport ends or Ctrl-C arrives
pub async fn start_server(
    settings: Arc<ServerSettings>,
    transport_config: Option<TransportConfig>,
) -> Result<()> {
    // Use transport from settings if not explicitly provided
    let transport = match transport_config {
        Some(transport) => transport,
        None => TransportConfig::from_settings(&settings)?,
    };

    let server = create_civicalert_server(build_context(&settings)?).await;
    info!(
        "Starting CivicAlert JSON-RPC server with {} transport",
        transport.description()
    );

    match transport {
        TransportConfig::Stdio => {
            let mut stdio = StdioTransport::stdio();
            tokio::select! {
                result = server.serve(&mut stdio) => result?,
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
            }
        }
        TransportConfig::UnixSocket { path } => {
            let listener = bind_socket(&path)?;
            let outcome = tokio::select! {
                result = server.serve_unix(listener) => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl-C, shutting down");
                    Ok(())
                }
            };
            remove_socket_file(&path);
            outcome?;
        }
    }

    info!("CivicAlert JSON-RPC server stopped");
    Ok(())
}

/// Bind a listener, replacing a stale socket file left by an earlier run
pub fn bind_socket(path: &str) -> Result<UnixListener> {
    let path_ref = Path::new(path);
    if path_ref.exists() {
        debug!("Removing stale socket file {}", path);
        std::fs::remove_file(path_ref)
            .map_err(|e| anyhow!("Failed to remove existing socket file {}: {}", path, e))?;
    }

    let listener = UnixListener::bind(path_ref)
        .map_err(|e| anyhow!("Failed to bind to socket {}: {}", path, e))?;
    info!("Listening on {}", path);
    Ok(listener)
}

fn remove_socket_file(path: &str) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Failed to remove socket file {}: {}", path, e);
    }
}
