#![allow(dead_code)]

use serde_json::{json, Value};

use civicalert::config::{init_test_logging, ServerSettings};
use civicalert::handlers::HandlerContext;
use civicalert::jsonrpc::{create_civicalert_server, JsonRpcRequest, JsonRpcResponse, JsonRpcServer};
use civicalert::server::build_context;

/// Settings with an empty store so tests control every record
pub fn test_settings() -> ServerSettings {
    let mut settings = ServerSettings::default();
    settings.store.demo_incidents = 0;
    settings.auth.session_ttl_minutes = 30;
    settings
}

pub struct TestServer {
    pub server: JsonRpcServer,
    pub context: HandlerContext,
}

impl TestServer {
    pub async fn new() -> Self {
        let _ = init_test_logging();
        let context = build_context(&test_settings()).expect("test settings are valid");
        let server = create_civicalert_server(context.clone()).await;
        Self { server, context }
    }

    /// Dispatch one request and return the full response
    pub async fn call(&self, method: &str, params: Value) -> JsonRpcResponse {
        self.server
            .dispatch(JsonRpcRequest::new(method, Some(params), Some(json!(1))))
            .await
            .expect("request with an id must get a response")
    }

    /// Dispatch and unwrap a successful result
    pub async fn ok(&self, method: &str, params: Value) -> Value {
        let response = self.call(method, params).await;
        if let Some(error) = response.error {
            panic!("{} failed: {}", method, error);
        }
        response.result.expect("success carries a result")
    }

    /// Dispatch and return the error code
    pub async fn err_code(&self, method: &str, params: Value) -> i32 {
        self.call(method, params)
            .await
            .error
            .map(|error| error.code)
            .unwrap_or_else(|| panic!("{} unexpectedly succeeded", method))
    }

    pub async fn admin_token(&self) -> String {
        let login = self
            .ok(
                "civicalert/auth/login",
                json!({"username": "admin", "password": "admin@123"}),
            )
            .await;
        login["token"].as_str().unwrap().to_string()
    }

    pub async fn report(&self, incident_type: &str, description: &str) -> Value {
        self.ok(
            "civicalert/incident/create",
            json!({
                "type": incident_type,
                "description": description,
                "latitude": 37.7749,
                "longitude": -122.4194,
            }),
        )
        .await
    }
}
