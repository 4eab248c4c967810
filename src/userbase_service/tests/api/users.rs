use futures::future::join_all;
use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn register_returns_201_with_message_and_id() {
    let app = TestApp::new().await;

    let response = app
        .post_user(&json!({ "name": "Rick", "email": "rick@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn registered_user_can_be_read_back() {
    let app = TestApp::new().await;
    app.post_user(&json!({ "name": "  Summer ", "email": "  Summer@Example.COM " }))
        .await;

    let response = app.get_user("1").await;

    assert_eq!(response.status().as_u16(), 200);
    let user: Value = response.json().await.unwrap();
    assert_eq!(
        user,
        json!({ "id": 1, "name": "Summer", "email": "summer@example.com", "bio": null })
    );
}

#[tokio::test]
async fn rick_then_morty_with_the_same_email() {
    let app = TestApp::new().await;

    let rick = app
        .post_user(&json!({ "name": "Rick", "email": "rick@example.com" }))
        .await;
    assert_eq!(rick.status().as_u16(), 201);

    let morty = app
        .post_user(&json!({ "name": "Morty", "email": "rick@example.com" }))
        .await;
    assert_eq!(morty.status().as_u16(), 409);
    let body: Value = morty.json().await.unwrap();
    assert_eq!(body["error"], "User already exists");

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Rick");
}

#[tokio::test]
async fn email_differing_only_in_case_is_a_duplicate() {
    let app = TestApp::new().await;

    app.post_user(&json!({ "name": "Rick", "email": "rick@example.com" }))
        .await;
    let response = app
        .post_user(&json!({ "name": "Evil Rick", "email": "RICK@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn invalid_payloads_return_400() {
    let app = TestApp::new().await;

    let test_cases = [
        json!({ "name": "Rick" }),
        json!({ "email": "rick@example.com" }),
        json!({ "name": "", "email": "rick@example.com" }),
        json!({ "name": "Rick", "email": "rick.example.com" }),
        json!({ "name": "Rick", "email": "rick@example" }),
        json!({ "name": 42, "email": "rick@example.com" }),
    ];

    for test_case in test_cases {
        let response = app.post_user(&test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let malformed = app.post_raw_user(r#"{"name": "Rick", "email""#).await;
    assert_eq!(malformed.status().as_u16(), 400);

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let unknown = app.get_user("999").await;
    assert_eq!(unknown.status().as_u16(), 404);
    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["error"], "User not found");

    let malformed = app.get_user("not-a-number").await;
    assert_eq!(malformed.status().as_u16(), 400);

    let object_id = app.get_user("507f1f77bcf86cd799439011").await;
    assert_eq!(object_id.status().as_u16(), 400);
}

#[tokio::test]
async fn list_is_empty_then_has_every_registration() {
    let app = TestApp::new().await;

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert!(users.is_empty());

    for n in 0..5 {
        let response = app
            .post_user(&json!({ "name": format!("Rick {n}"), "email": format!("rick{n}@example.com") }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert_eq!(users.len(), 5);
    let ids: Vec<i64> = users.iter().map(|user| user["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_create_exactly_one_user() {
    let app = TestApp::new().await;

    let bodies: Vec<Value> = (0..20)
        .map(|n| json!({ "name": format!("Rick {n}"), "email": "rick@example.com" }))
        .collect();

    let responses = join_all(bodies.iter().map(|body| app.post_user(body))).await;

    let statuses: Vec<u16> = responses.iter().map(|r| r.status().as_u16()).collect();
    assert_eq!(statuses.iter().filter(|&&s| s == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|&&s| s == 409).count(), 19);

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert_eq!(users.len(), 1);
}
