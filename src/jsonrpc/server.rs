//! JSON-RPC server implementation with method dispatch
//!
//! The method registry is shared by every connection; each transport is
//! served by its own loop, so one Unix-socket client never blocks another.

use crate::jsonrpc::{
    protocol::{error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse},
    transport::{IpcTransport, Transport},
};
use crate::CivicAlertError;
use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Method handler function signature
/// Takes JSON parameters and returns a JSON result
pub type MethodHandler = Arc<
    dyn Fn(Option<serde_json::Value>) -> BoxFuture<'static, Result<serde_json::Value, JsonRpcError>>
        + Send
        + Sync,
>;

/// JSON-RPC method registry and dispatcher
#[derive(Clone, Default)]
pub struct JsonRpcServer {
    methods: Arc<RwLock<HashMap<String, MethodHandler>>>,
}

impl JsonRpcServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method handler
    pub async fn register_method<F, Fut>(&self, method_name: impl Into<String>, handler: F)
    where
        F: Fn(Option<serde_json::Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<serde_json::Value, JsonRpcError>> + Send + 'static,
    {
        let method_name = method_name.into();
        let wrapped_handler: MethodHandler = Arc::new(move |params| Box::pin(handler(params)));

        self.methods
            .write()
            .await
            .insert(method_name.clone(), wrapped_handler);
        debug!("Registered method: {}", method_name);
    }

    /// Process a request and return a response (none for notifications)
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let request_id = request.id.clone();
        let is_notification = request.is_notification();

        if let Err(error) = request.validate() {
            if is_notification {
                warn!("Invalid notification: {}", error.message);
                return None;
            }
            return Some(JsonRpcResponse::error(error, request_id));
        }

        let handler = self.methods.read().await.get(&request.method).cloned();
        let handler = match handler {
            Some(handler) => handler,
            None => {
                if is_notification {
                    warn!("Method not found for notification: {}", request.method);
                    return None;
                }
                return Some(JsonRpcResponse::method_not_found(&request.method, request_id));
            }
        };

        match handler(request.params).await {
            Ok(result) => {
                debug!("Request handled");
                (!is_notification).then(|| JsonRpcResponse::success(result, request_id))
            }
            Err(error) => {
                debug!(code = error.code, "Request failed: {}", error.message);
                if is_notification {
                    error!(
                        "Error in notification handler for {}: {}",
                        request.method, error.message
                    );
                    None
                } else {
                    Some(JsonRpcResponse::error(error, request_id))
                }
            }
        }
    }

    /// Decode one framed message, dispatch it and encode the reply
    pub async fn handle_message(&self, raw: &str) -> Option<String> {
        let response = match serde_json::from_str::<serde_json::Value>(raw) {
            Err(e) => Some(JsonRpcResponse::parse_error(&e.to_string())),
            Ok(value) => {
                let id = value.get("id").cloned();
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.dispatch(request).await,
                    Err(e) => Some(JsonRpcResponse::error(
                        JsonRpcError::custom(
                            error_codes::INVALID_REQUEST,
                            format!("Invalid Request: {}", e),
                            None,
                        ),
                        id,
                    )),
                }
            }
        }?;

        match serde_json::to_string(&response) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                error!("Failed to encode response: {}", e);
                None
            }
        }
    }

    /// Serve one transport until the peer closes it
    pub async fn serve<T>(&self, transport: &mut T) -> Result<()>
    where
        T: Transport + ?Sized,
    {
        info!("Serving JSON-RPC over {}", transport.description());

        loop {
            let message = match transport.read_message().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!("Peer closed {}", transport.description());
                    break;
                }
                Err(e) => {
                    // Framing is lost; the stream cannot be resynchronised
                    error!("Failed to read message: {}", e);
                    let response = match e.downcast::<CivicAlertError>() {
                        Ok(framing) => JsonRpcResponse::error(framing.into(), None),
                        Err(other) => JsonRpcResponse::parse_error(&other.to_string()),
                    };
                    if let Ok(encoded) = serde_json::to_string(&response) {
                        if let Err(write_err) = transport.write_message(&encoded).await {
                            debug!("Failed to send error response: {}", write_err);
                        }
                    }
                    break;
                }
            };

            if let Some(reply) = self.handle_message(&message).await {
                if let Err(e) = transport.write_message(&reply).await {
                    error!("Failed to send response: {}", e);
                    break;
                }
            }
        }

        if let Err(e) = transport.close().await {
            debug!("Error closing transport: {}", e);
        }
        Ok(())
    }

    /// Accept Unix-socket clients forever, one task per connection
    pub async fn serve_unix(&self, listener: UnixListener) -> Result<()> {
        loop {
            let (stream, _addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let server = self.clone();
            tokio::spawn(async move {
                debug!("Client connected");
                let mut transport = IpcTransport::from_stream(stream);
                if let Err(e) = server.serve(&mut transport).await {
                    error!("Connection ended with error: {}", e);
                }
                debug!("Client disconnected");
            });
        }
    }

    /// Get the list of registered methods, sorted
    pub async fn get_registered_methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.methods.read().await.keys().cloned().collect();
        methods.sort();
        methods
    }
}
