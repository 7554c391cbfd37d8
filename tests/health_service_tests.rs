// tests/health_service_tests.rs
// End-to-end checks over real sockets: each test binds an ephemeral port so
// multiple service instances can run side by side in one process.
use std::sync::Arc;

use compat_health::health::{HealthService, NoopChecker, ServiceIdentity};
use compat_health::server::{HealthServer, ServerHandle};
use compat_health::CompatibilityMap;

fn service(name: &str, version: &str, entries: &[(&str, &str)]) -> Arc<HealthService> {
    let map: CompatibilityMap = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(HealthService::new(
        ServiceIdentity {
            name: name.to_string(),
            version: version.to_string(),
        },
        map,
        Arc::new(NoopChecker),
    ))
}

async fn start(service: Arc<HealthService>) -> ServerHandle {
    HealthServer::new("127.0.0.1:0".parse().unwrap(), service)
        .start()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_serves_identity_and_status() {
    let handle = start(service("svc-a", "1.0.0", &[("foo", "^1.0.0")])).await;
    let url = format!("http://{}/health", handle.local_addr());

    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "svc-a");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["status"], "UP");
    assert_eq!(body["compatibleWith"]["foo"], "^1.0.0");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);

    handle.shutdown().await;
}

#[tokio::test]
async fn invalid_declared_range_surfaces_as_errored() {
    let handle = start(service("svc-a", "1.0.0", &[("foo", "not-a-range")])).await;
    let url = format!("http://{}/health", handle.local_addr());

    let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body["status"], "ERRORED");
    let errors = body["compatibleWith"]["error"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("foo"));

    handle.shutdown().await;
}

#[tokio::test]
async fn compatibility_endpoint_answers_over_http() {
    let handle = start(service("svc-a", "1.0.0", &[("foo", "^1.0.0")])).await;
    let base = format!("http://{}", handle.local_addr());

    let response = reqwest::get(format!(
        "{base}/checkCompatability?name=foo&version=1.2.3-beta"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"result": true}));

    let response = reqwest::get(format!("{base}/checkCompatability?name=bar&version=1.0.0"))
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"result": false}));

    handle.shutdown().await;
}

#[tokio::test]
async fn two_instances_verify_each_other() {
    // A declares it works with svc-b ^1.0.0; B declares nothing about A.
    let a = service("svc-a", "2.0.0", &[("svc-b", "^1.0.0")]);
    let b = service("svc-b", "1.2.3", &[]);

    let handle_b = start(b.clone()).await;
    let b_health_url = format!("http://{}/health", handle_b.local_addr());

    assert!(a.check_compatibility_with(&b_health_url).await);

    let handle_a = start(a).await;
    let a_health_url = format!("http://{}/health", handle_a.local_addr());
    assert!(!b.check_compatibility_with(&a_health_url).await);

    handle_a.shutdown().await;
    handle_b.shutdown().await;
}

#[tokio::test]
async fn peer_check_survives_shutdown_peer() {
    let a = service("svc-a", "2.0.0", &[("svc-b", "^1.0.0")]);
    let handle_b = start(service("svc-b", "1.2.3", &[])).await;
    let b_health_url = format!("http://{}/health", handle_b.local_addr());
    handle_b.shutdown().await;

    // The peer is gone; the check reports false rather than erroring.
    assert!(!a.check_compatibility_with(&b_health_url).await);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let handle = start(service("svc-a", "1.0.0", &[])).await;
    let response = reqwest::get(format!("http://{}/nope", handle.local_addr()))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    handle.shutdown().await;
}
