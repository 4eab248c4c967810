use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn health_reports_server_and_database() {
    let app = TestApp::new().await;

    let response = app.get_health().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "server": "ok",
            "database": { "status": "up", "detail": "It's healthy" }
        })
    );
}

#[tokio::test]
async fn responses_carry_no_cors_headers_by_default() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/health", &app.address))
        .header("origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}
