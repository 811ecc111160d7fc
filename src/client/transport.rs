//! JSON-RPC client transport for Unix socket communication

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::net::UnixStream;
use tracing::debug;
use uuid::Uuid;

use crate::jsonrpc::{IpcTransport, JsonRpcRequest, JsonRpcResponse, Transport, LOGIN};

/// JSON-RPC client for Unix socket communication
pub struct JsonRpcClient {
    socket_path: String,
}

impl JsonRpcClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Check that the socket exists and accepts connections
    pub async fn validate_connection(&self) -> Result<bool> {
        if !Path::new(&self.socket_path).exists() {
            return Ok(false);
        }

        Ok(UnixStream::connect(&self.socket_path).await.is_ok())
    }

    /// Execute one JSON-RPC call on a fresh connection.
    ///
    /// A JSON-RPC error reply comes back as an `anyhow::Error` wrapping
    /// [`crate::jsonrpc::JsonRpcError`], so callers can downcast for the code.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        let request = JsonRpcRequest::new(method, Some(params), Some(Value::String(request_id.clone())));

        let mut transport = IpcTransport::connect(&self.socket_path).await?;

        let request_json = serde_json::to_string(&request)
            .map_err(|e| anyhow!("Failed to serialize request: {}", e))?;
        debug!(method, "Sending request");
        transport.write_message(&request_json).await?;

        let message = transport
            .read_message()
            .await?
            .ok_or_else(|| anyhow!("Server closed the connection before replying"))?;
        let _ = transport.close().await;

        let response: JsonRpcResponse = serde_json::from_str(&message)
            .map_err(|e| anyhow!("Failed to parse response: {}", e))?;

        let response_id = response.id.as_ref().and_then(|v| v.as_str()).unwrap_or("");
        if let Some(error) = response.error {
            return Err(anyhow::Error::new(error));
        }
        if response_id != request_id {
            return Err(anyhow!(
                "Response ID mismatch: expected {}, got {}",
                request_id,
                response_id
            ));
        }

        response
            .result
            .ok_or_else(|| anyhow!("Response missing both result and error"))
    }

    /// Log in and return the raw `{token, user, expiresAt}` result
    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        self.call(
            LOGIN,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }
}

/// Remembers the server socket and staff token between CLI invocations
/// (`~/.civicalert/connection` and `~/.civicalert/token`).
pub struct ConnectionState {
    dir: PathBuf,
}

impl ConnectionState {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("Unable to determine home directory"))?;
        Ok(Self::new(home_dir.join(".civicalert")))
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(name), value)?;
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let value = std::fs::read_to_string(&path)?.trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn save_socket(&self, socket_path: &str) -> Result<()> {
        self.write("connection", socket_path)
    }

    pub fn socket(&self) -> Result<Option<String>> {
        self.read("connection")
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.write("token", token)
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.read("token")
    }

    pub fn clear_token(&self) -> Result<()> {
        self.remove("token")
    }

    /// Forget both the socket and the token
    pub fn clear(&self) -> Result<()> {
        self.remove("connection")?;
        self.remove("token")
    }

    /// Client for an explicit socket, else the saved one
    pub fn client(&self, socket_path: Option<String>) -> Result<JsonRpcClient> {
        let socket_path = match socket_path {
            Some(path) => path,
            None => self.socket()?.ok_or_else(|| {
                anyhow!("Not connected to any server. Use 'civicalert connect <socket_path>' first.")
            })?,
        };
        Ok(JsonRpcClient::new(socket_path))
    }
}
