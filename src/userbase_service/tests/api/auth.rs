use std::time::Duration;

use serde_json::{Value, json};
use userbase_core::{Email, UserStore, UserStoreError};
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

use crate::helpers::TestApp;

#[tokio::test]
async fn login_copies_provider_status_cookies_and_body() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("cookie", "ab_blog_csrf=token"))
        .and(body_json(json!({ "email": "rick@example.com", "password": "pickle" })))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "ab_blog=session; Path=/; HttpOnly")
                .append_header("set-cookie", "ab_blog_remember=token; Path=/")
                .set_body_json(json!({ "status": "success", "location": "/" })),
        )
        .expect(1)
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_login(
            &json!({ "email": "Rick@Example.com", "password": "pickle" }),
            Some("ab_blog_csrf=token"),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let cookies: Vec<_> = response.headers().get_all("set-cookie").iter().collect();
    assert_eq!(cookies.len(), 2);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn login_redirect_is_relayed_with_location() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("location", "/dashboard")
                .insert_header("set-cookie", "ab_blog=session; Path=/"),
        )
        .expect(1)
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_login(&json!({ "email": "rick@example.com", "password": "pickle" }), None)
        .await;

    assert_eq!(response.status().as_u16(), 307);
    assert_eq!(response.headers().get("location").unwrap(), "/dashboard");
    assert_eq!(
        response.headers().get("set-cookie").unwrap(),
        "ab_blog=session; Path=/"
    );
}

#[tokio::test]
async fn rejected_login_keeps_provider_status() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid Credentials" })),
        )
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_login(&json!({ "email": "rick@example.com", "password": "wrong" }), None)
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid Credentials");
}

#[tokio::test]
async fn login_with_invalid_payload_never_reaches_provider() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.identity_server)
        .await;

    let test_cases = [
        json!({ "email": "rick@example.com" }),
        json!({ "email": "not-an-email", "password": "pickle" }),
    ];

    for test_case in test_cases {
        let response = app.post_login(&test_case, None).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[tokio::test]
async fn slow_provider_is_a_bad_gateway() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_login(&json!({ "email": "rick@example.com", "password": "pickle" }), None)
        .await;

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Identity provider unavailable");
}

#[tokio::test]
async fn identity_routes_are_unavailable_without_provider() {
    let app = TestApp::without_identity().await;

    let login = app
        .post_login(&json!({ "email": "rick@example.com", "password": "pickle" }), None)
        .await;
    assert_eq!(login.status().as_u16(), 503);

    let callback = app
        .post_oauth_callback("google", &json!({ "code": "4/abc" }))
        .await;
    assert_eq!(callback.status().as_u16(), 503);

    // Registration does not depend on the provider
    let register = app
        .post_user(&json!({ "name": "Rick", "email": "rick@example.com" }))
        .await;
    assert_eq!(register.status().as_u16(), 201);
}

#[tokio::test]
async fn oauth_callback_creates_a_profile_once() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/google/callback"))
        .and(query_param("code", "4/abc"))
        .and(query_param("state", "xyz"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "ab_blog=session; Path=/")
                .set_body_json(json!({ "email": "Summer@Example.com" })),
        )
        .expect(2)
        .mount(&app.identity_server)
        .await;

    for _ in 0..2 {
        let response = app
            .post_oauth_callback("google", &json!({ "code": "4/abc", "state": "xyz" }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.headers().get("set-cookie").is_some());
    }

    let email = Email::parse("summer@example.com").unwrap();
    let user = app.store.find_by_email(&email).await.unwrap();
    assert_eq!(user.name().as_str(), "Unknown");
    assert_eq!(user.bio(), None);

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn oauth_callback_keeps_an_existing_profile() {
    let app = TestApp::new().await;
    app.post_user(&json!({ "name": "Rick", "email": "rick@example.com" }))
        .await;

    Mock::given(method("GET"))
        .and(path("/oauth2/google/callback"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "email": "rick@example.com" })),
        )
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_oauth_callback("google", &json!({ "code": "4/abc" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let users: Vec<Value> = app.get_users().await.json().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Rick");
}

#[tokio::test]
async fn failed_oauth_callback_creates_nothing() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/google/callback"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "email": "morty@example.com" })),
        )
        .mount(&app.identity_server)
        .await;

    let response = app
        .post_oauth_callback("google", &json!({ "code": "expired" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let email = Email::parse("morty@example.com").unwrap();
    assert_eq!(
        app.store.find_by_email(&email).await,
        Err(UserStoreError::UserNotFound)
    );
}

#[tokio::test]
async fn oauth_callback_with_invalid_payload_returns_400() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.identity_server)
        .await;

    let missing_code = app
        .post_oauth_callback("google", &json!({ "state": "xyz" }))
        .await;
    assert_eq!(missing_code.status().as_u16(), 400);

    let empty_code = app
        .post_oauth_callback("google", &json!({ "code": "  " }))
        .await;
    assert_eq!(empty_code.status().as_u16(), 400);

    let bad_provider = app
        .post_oauth_callback("Google", &json!({ "code": "4/abc" }))
        .await;
    assert_eq!(bad_provider.status().as_u16(), 400);
}
