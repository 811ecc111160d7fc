mod common;

use common::TestServer;
use serde_json::{json, Value};

use civicalert::jsonrpc::{protocol::error_codes, ALL_METHODS};

#[tokio::test]
async fn test_every_method_is_registered() {
    let server = TestServer::new().await;
    let mut expected: Vec<String> = ALL_METHODS.iter().map(|m| m.to_string()).collect();
    expected.sort();

    assert_eq!(server.server.get_registered_methods().await, expected);
}

#[tokio::test]
async fn test_login_shapes() {
    let server = TestServer::new().await;

    let login = server
        .ok(
            "civicalert/auth/login",
            json!({"username": "responder", "password": "resp@123"}),
        )
        .await;
    assert!(uuid::Uuid::parse_str(login["token"].as_str().unwrap()).is_ok());
    assert_eq!(login["user"]["role"], "responder");
    assert_eq!(login["user"]["name"], "First Responder");
    assert!(login["expiresAt"].is_string());

    let code = server
        .err_code(
            "civicalert/auth/login",
            json!({"username": "responder", "password": "wrong"}),
        )
        .await;
    assert_eq!(code, error_codes::INVALID_CREDENTIALS);
}

#[tokio::test]
async fn test_staff_methods_reject_missing_or_revoked_tokens() {
    let server = TestServer::new().await;
    server.report("fire", "Wildfire approaching residential zone").await;

    // Missing token field fails deserialisation
    assert_eq!(
        server.err_code("civicalert/stats", json!({})).await,
        error_codes::INVALID_PARAMS
    );
    assert_eq!(
        server
            .err_code("civicalert/stats", json!({"token": "forged"}))
            .await,
        error_codes::UNAUTHORIZED
    );

    let token = server.admin_token().await;
    let out = server
        .ok("civicalert/auth/logout", json!({"token": token}))
        .await;
    assert_eq!(out, json!({"loggedOut": true}));

    assert_eq!(
        server
            .err_code(
                "civicalert/incident/mark_false_report",
                json!({"token": token, "id": "INC-000001"}),
            )
            .await,
        error_codes::UNAUTHORIZED
    );

    // Public methods need no token
    server
        .ok("civicalert/incident/confirm", json!({"id": "INC-000001"}))
        .await;
}

#[tokio::test]
async fn test_boundary_validation() {
    let server = TestServer::new().await;

    let cases: Vec<Value> = vec![
        json!({"type": "fire", "description": "short", "latitude": 0.0, "longitude": 0.0}),
        json!({"type": "fire", "description": "Smoke over the ridge", "latitude": 120.0, "longitude": 0.0}),
        json!({"type": "fire", "description": "Smoke over the ridge", "latitude": 0.0, "longitude": -181.0}),
        json!({"type": "flood", "description": "Smoke over the ridge", "latitude": 0.0, "longitude": 0.0}),
        json!({"description": "Smoke over the ridge", "latitude": 0.0, "longitude": 0.0}),
        json!({"type": "fire", "description": "x".repeat(501), "latitude": 0.0, "longitude": 0.0}),
    ];

    for params in cases {
        let response = server.call("civicalert/incident/create", params.clone()).await;
        let error = response
            .error
            .unwrap_or_else(|| panic!("accepted invalid params {}", params));
        assert_eq!(error.code, error_codes::INVALID_PARAMS, "params: {}", params);
    }

    let token = server.admin_token().await;
    server.report("fire", "Smoke over the ridge line").await;
    assert_eq!(
        server
            .err_code(
                "civicalert/incident/set_status",
                json!({"token": token, "id": "INC-000001", "status": "closed"}),
            )
            .await,
        error_codes::INVALID_PARAMS
    );
    assert_eq!(
        server
            .err_code(
                "civicalert/incident/add_note",
                json!({"token": token, "id": "INC-000001", "note": ""}),
            )
            .await,
        error_codes::INVALID_PARAMS
    );
    assert_eq!(
        server
            .err_code("civicalert/incident/get", json!({"id": ""}))
            .await,
        error_codes::INVALID_PARAMS
    );
}

#[tokio::test]
async fn test_error_data_names_the_incident() {
    let server = TestServer::new().await;
    let response = server
        .call("civicalert/incident/confirm", json!({"id": "INC-000077"}))
        .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::INCIDENT_NOT_FOUND);
    let data = error.data.unwrap();
    assert_eq!(data["error_type"], "not_found");
    assert_eq!(data["incident_id"], "INC-000077");
}

#[tokio::test]
async fn test_raw_messages() {
    let server = TestServer::new().await;

    let reply = server
        .server
        .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"civicalert/incident/list"}"#)
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["id"], "a");
    assert_eq!(value["result"]["total"], 0);

    let reply = server
        .server
        .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"civicalert/nope"}"#)
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["error"]["code"], error_codes::METHOD_NOT_FOUND);

    // Notifications get no reply even when they mutate
    assert!(server
        .server
        .handle_message(
            r#"{"jsonrpc":"2.0","method":"civicalert/incident/create","params":{"type":"safety","description":"Public disturbance downtown","latitude":1.0,"longitude":1.0}}"#
        )
        .await
        .is_none());
    let list = server.ok("civicalert/incident/list", json!({})).await;
    assert_eq!(list["total"], 1);
}
