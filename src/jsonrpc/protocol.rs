//! JSON-RPC 2.0 protocol types for LSP-style communication.

use serde::{Deserialize, Serialize};

use super::JSONRPC_VERSION;
use crate::CivicAlertError;

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Request ID (string or number; absent for notifications)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Standard JSON-RPC 2.0 error codes plus application codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const TRANSPORT_ERROR: i32 = -32001;
    pub const INCIDENT_NOT_FOUND: i32 = -32004;
    pub const INVALID_CREDENTIALS: i32 = -32010;
    pub const UNAUTHORIZED: i32 = -32011;
    pub const INCIDENT_LOCKED: i32 = -32012;
    pub const CONFIGURATION_ERROR: i32 = -32014;
}

impl JsonRpcRequest {
    pub fn new(
        method: impl Into<String>,
        params: Option<serde_json::Value>,
        id: Option<serde_json::Value>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Create a notification (request without id)
    pub fn notification(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self::new(method, params, None)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Validate the request envelope
    pub fn validate(&self) -> Result<(), JsonRpcError> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcError::custom(
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
                None,
            ));
        }

        if self.method.is_empty() {
            return Err(JsonRpcError::custom(
                error_codes::INVALID_REQUEST,
                "Method name cannot be empty",
                None,
            ));
        }

        if self.method.starts_with("rpc.") {
            return Err(JsonRpcError::custom(
                error_codes::INVALID_REQUEST,
                "Method names starting with 'rpc.' are reserved",
                None,
            ));
        }

        Ok(())
    }
}

impl JsonRpcResponse {
    pub fn success(result: serde_json::Value, id: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn parse_error(detail: &str) -> Self {
        Self::error(
            JsonRpcError::custom(
                error_codes::PARSE_ERROR,
                "Parse error",
                Some(serde_json::json!({ "details": detail })),
            ),
            None,
        )
    }

    pub fn method_not_found(method: &str, id: Option<serde_json::Value>) -> Self {
        Self::error(
            JsonRpcError::custom(
                error_codes::METHOD_NOT_FOUND,
                "Method not found",
                Some(serde_json::json!({ "method": method })),
            ),
            id,
        )
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl JsonRpcError {
    pub fn custom(code: i32, message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self::custom(
            error_codes::INVALID_PARAMS,
            format!("Invalid params: {}", message),
            None,
        )
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::custom(
            error_codes::INTERNAL_ERROR,
            format!("Internal error: {}", message),
            None,
        )
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

/// Convert a domain error into a JSON-RPC error object
impl From<CivicAlertError> for JsonRpcError {
    fn from(error: CivicAlertError) -> Self {
        let mut data = serde_json::json!({ "error_type": error.kind() });
        if let Some(id) = error.incident_id() {
            data["incident_id"] = serde_json::Value::String(id.to_string());
        }

        JsonRpcError {
            code: error.error_code(),
            message: error.user_message(),
            data: Some(data),
        }
    }
}
