mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_ok() {
    let app = common::spawn_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["database"]["status"], "healthy");
    assert_eq!(body["checks"]["cache"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let app = common::spawn_app();

    for _ in 0..150 {
        app.server.get("/health").await.assert_status_ok();
    }
}
