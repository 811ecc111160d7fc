//! JSON-RPC 2.0 surface of the incident service
//!
//! - LSP-style Content-Length framing over stdio or Unix sockets
//! - A shared method registry dispatching to typed handlers
//! - Domain errors mapped onto JSON-RPC error objects

pub mod methods;
pub mod protocol;
pub mod server;
pub mod transport;

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::handlers::{
    AddNoteRequest, CreateIncidentRequest, HandlerContext, IncidentIdRequest, ListIncidentsRequest,
    LoginRequest, LogoutRequest, SetSeverityRequest, SetStatusRequest, StaffIncidentRequest,
    StatsRequest,
};
use crate::CivicResult;

pub use methods::*;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::{JsonRpcServer, MethodHandler};
pub use transport::{FramedTransport, IpcTransport, StdioTransport, Transport, TransportConfig};

pub const JSONRPC_VERSION: &str = "2.0";

/// Build a server with every CivicAlert method registered
pub async fn create_civicalert_server(context: HandlerContext) -> JsonRpcServer {
    let server = JsonRpcServer::new();
    register_civicalert_methods(&server, context).await;
    server
}

macro_rules! route {
    ($server:expr, $method:expr, $handler:expr, $call:ident, $request:ty) => {{
        let handler = $handler.clone();
        register_typed::<$request, _, _, _>($server, $method, move |request: $request| {
            let handler = handler.clone();
            async move { handler.$call(request).await }
        })
        .await;
    }};
}

/// Register all CivicAlert JSON-RPC methods with the server
///
/// Methods take their params as a flat JSON object, for example
/// `civicalert/incident/set_status` accepts:
/// ```json
/// { "token": "...", "id": "INC-000004", "status": "in-progress" }
/// ```
pub async fn register_civicalert_methods(server: &JsonRpcServer, context: HandlerContext) {
    let incidents = Arc::new(context.incident_handler());
    let auth = Arc::new(context.auth_handler());
    let dashboard = Arc::new(context.dashboard_handler());

    route!(server, CREATE_INCIDENT, incidents, create, CreateIncidentRequest);
    route!(server, CONFIRM_INCIDENT, incidents, confirm, IncidentIdRequest);
    route!(server, GET_INCIDENT, incidents, get, IncidentIdRequest);
    route!(server, LIST_INCIDENTS, incidents, list, ListIncidentsRequest);
    route!(server, SET_STATUS, incidents, set_status, SetStatusRequest);
    route!(server, SET_SEVERITY, incidents, set_severity, SetSeverityRequest);
    route!(server, ADD_NOTE, incidents, add_note, AddNoteRequest);
    route!(server, MARK_FALSE_REPORT, incidents, mark_false_report, StaffIncidentRequest);
    route!(server, GET_STATS, dashboard, stats, StatsRequest);
    route!(server, LOGIN, auth, login, LoginRequest);
    route!(server, LOGOUT, auth, logout, LogoutRequest);

    tracing::info!("Registered {} CivicAlert JSON-RPC methods", ALL_METHODS.len());
}

/// Register a handler that takes typed params and returns a serialisable result
async fn register_typed<Req, Resp, F, Fut>(server: &JsonRpcServer, method: &'static str, handler: F)
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + Clone + 'static,
    Fut: std::future::Future<Output = CivicResult<Resp>> + Send + 'static,
{
    server
        .register_method(method, move |params| {
            let handler = handler.clone();
            async move {
                // Absent params behave like an empty object
                let params_value =
                    params.unwrap_or_else(|| serde_json::Value::Object(Default::default()));

                let request: Req = serde_json::from_value(params_value.clone())
                    .map_err(|e| create_parse_error::<Req>(&e, &params_value))?;

                let response = handler(request).await.map_err(JsonRpcError::from)?;

                serde_json::to_value(response).map_err(|e| {
                    JsonRpcError::internal(format!("Failed to serialize response: {}", e))
                })
            }
        })
        .await;
}

fn create_parse_error<T>(error: &serde_json::Error, params: &serde_json::Value) -> JsonRpcError {
    let type_name = std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Request");

    let received_fields: Vec<&str> = match params {
        serde_json::Value::Object(map) => map.keys().map(|s| s.as_str()).collect(),
        _ => vec![],
    };

    let hint = if received_fields.is_empty() {
        "No parameters provided".to_string()
    } else {
        format!("Received fields: {}", received_fields.join(", "))
    };

    // Field names are echoed, the params object is not. serde's own message
    // can still quote the single value it rejected.
    JsonRpcError::custom(
        protocol::error_codes::INVALID_PARAMS,
        format!("Invalid {}: {}. {}", type_name, error, hint),
        Some(serde_json::json!({
            "parse_error": error.to_string(),
            "received_fields": received_fields,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_lists_fields_but_not_values() {
        let params = serde_json::json!({"username": "admin", "password": "hunter2"});
        let error = serde_json::from_value::<StatsRequest>(params.clone()).unwrap_err();
        let rpc_error = create_parse_error::<StatsRequest>(&error, &params);

        assert_eq!(rpc_error.code, protocol::error_codes::INVALID_PARAMS);
        assert!(rpc_error.message.starts_with("Invalid StatsRequest"));
        assert!(rpc_error.message.contains("password"));
        assert!(!rpc_error.to_string().contains("hunter2"));
        assert!(!rpc_error.data.unwrap().to_string().contains("hunter2"));
    }

    #[test]
    fn test_parse_error_quotes_only_the_rejected_value() {
        let params = serde_json::json!({"token": "secret-token", "id": "INC-000001", "status": "closed"});
        let error = serde_json::from_value::<SetStatusRequest>(params.clone()).unwrap_err();
        let rpc_error = create_parse_error::<SetStatusRequest>(&error, &params);

        let rendered = rpc_error.data.unwrap().to_string();
        assert!(rendered.contains("closed"));
        assert!(!rendered.contains("secret-token"));
        assert!(!rpc_error.message.contains("secret-token"));
    }
}
