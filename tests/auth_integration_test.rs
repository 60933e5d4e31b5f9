mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp, ADMIN_EMAIL, PASSWORD, USER_EMAIL};

#[tokio::test]
async fn signup_then_signin_issues_a_working_token() {
    let app = TestApp::new().await;
    let credentials = json!({ "email": "New.Driver@Example.com", "password": "long-enough-secret" });

    let response = app
        .request(Method::POST, "/api/v1/auth/signup", Some(credentials.clone()), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let profile = read_json(response).await["data"].clone();
    assert_eq!(profile["email"], json!("new.driver@example.com"));
    assert_eq!(profile["is_admin"], json!(false));
    assert!(profile.get("password").is_none());

    let response = app
        .request(Method::POST, "/api/v1/auth/signin", Some(credentials), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = read_json(response).await["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await["data"]["email"],
        json!("new.driver@example.com")
    );
}

#[tokio::test]
async fn signup_rejects_duplicates_and_weak_input() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "email": USER_EMAIL.to_uppercase(), "password": "another-password" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "email": "short@example.com", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "email": "not-an-email", "password": "long-enough-secret" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], json!("AUTH_MISSING_TOKEN"));

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some("garbage"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&app.admin_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["is_admin"], json!(true));
}

#[tokio::test]
async fn password_reset_flow_replaces_the_password_once() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/auth/reset_password/{}", USER_EMAIL),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, USER_EMAIL);
    let link = sent[0]
        .body
        .split_whitespace()
        .find(|word| word.starts_with("http://shop.test/reset_password/"))
        .expect("reset link in mail body");
    let token = link.rsplit('/').next().expect("token segment");
    assert_eq!(token.len(), 32);

    let callback = format!("/api/v1/auth/reset_password_callback/{}", token);
    let response = app
        .request(
            Method::POST,
            &callback,
            Some(json!({ "password": "brand-new-password" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            Some(json!({ "email": USER_EMAIL, "password": "brand-new-password" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            Some(json!({ "email": USER_EMAIL, "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Tokens are single use
    let response = app
        .request(
            Method::POST,
            &callback,
            Some(json!({ "password": "yet-another-password" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_request_for_unknown_email_looks_the_same() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/auth/reset_password/ghost@example.com",
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.mailer.sent().await.is_empty());
}
