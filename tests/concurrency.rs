mod common;

use common::TestServer;
use serde_json::json;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_confirms_both_count() {
    let server = Arc::new(TestServer::new().await);
    server.report("medical", "Cardiac emergency at office building").await;

    let first = {
        let server = server.clone();
        tokio::spawn(async move {
            server
                .ok("civicalert/incident/confirm", json!({"id": "INC-000001"}))
                .await
        })
    };
    let second = {
        let server = server.clone();
        tokio::spawn(async move {
            server
                .ok("civicalert/incident/confirm", json!({"id": "INC-000001"}))
                .await
        })
    };
    first.await.unwrap();
    second.await.unwrap();

    let record = server
        .ok("civicalert/incident/get", json!({"id": "INC-000001"}))
        .await;
    assert_eq!(record["confirmations"], 3);
    assert_eq!(record["status"], "verified");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let server = Arc::new(TestServer::new().await);

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let server = server.clone();
            tokio::spawn(async move {
                server
                    .report("infrastructure", &format!("Pothole number {} on the avenue", i))
                    .await["id"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 40);
    assert_eq!(ids.first().map(String::as_str), Some("INC-000001"));
    assert_eq!(ids.last().map(String::as_str), Some("INC-000040"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_mutations_keep_score_consistent() {
    let server = Arc::new(TestServer::new().await);
    let token = server.admin_token().await;
    server.report("fire", "Smoke emanating from residential area").await;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let server = server.clone();
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                server
                    .ok("civicalert/incident/confirm", json!({"id": "INC-000001"}))
                    .await;
            } else {
                let severity = if i % 4 == 1 { "high" } else { "low" };
                server
                    .ok(
                        "civicalert/incident/set_severity",
                        json!({"token": token, "id": "INC-000001", "severity": severity}),
                    )
                    .await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let record = server
        .ok("civicalert/incident/get", json!({"id": "INC-000001"}))
        .await;
    assert_eq!(record["confirmations"], 11);

    let severity_weight = match record["severity"].as_str().unwrap() {
        "high" => 3.0,
        "low" => 1.0,
        other => panic!("unexpected severity {}", other),
    };
    // fire 5 * severity + min(11 * 0.5, 5)
    assert_eq!(record["priorityScore"].as_f64().unwrap(), 5.0 * severity_weight + 5.0);
}
