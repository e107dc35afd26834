//! Registration, login and profile over HTTP.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

fn assert_no_password(user: &serde_json::Value) {
    let object = user.as_object().unwrap();
    assert!(!object.contains_key("password"));
    assert!(!object.contains_key("passwordHash"));
    assert!(!object.contains_key("password_hash"));
}

#[tokio::test]
async fn test_register_returns_token_and_public_user() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/register",
            None,
            json!({ "name": "Ada", "email": "ada@shop.test", "password": "pw-1" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@shop.test");
    assert!(body["user"]["_id"].is_string());
    assert!(body["user"]["createdAt"].is_string());
    assert_no_password(&body["user"]);
    assert!(!body.to_string().contains("plain$"));
}

#[tokio::test]
async fn test_register_twice_is_conflict_and_keeps_first_user() {
    let app = TestApp::new();
    let (_, first) = app.register("Ada", "ada@shop.test", "first-pw").await;

    let (status, body) = app
        .post(
            "/api/register",
            None,
            json!({ "name": "Impostor", "email": "ada@shop.test", "password": "other" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));

    // Original credentials still work and resolve to the original user.
    let (status, body) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ada@shop.test", "password": "first-pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["_id"], first["_id"]);
    assert_eq!(body["user"]["name"], "Ada");
}

#[tokio::test]
async fn test_register_missing_field_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/register",
            None,
            json!({ "name": "Ada", "email": "ada@shop.test" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("Ada", "ada@shop.test", "right").await;

    let wrong_password = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ada@shop.test", "password": "wrong" }),
        )
        .await;
    let unknown_email = app
        .post(
            "/api/login",
            None,
            json!({ "email": "nobody@shop.test", "password": "right" }),
        )
        .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_email_match_is_case_sensitive() {
    let app = TestApp::new();
    app.register("Ada", "ada@shop.test", "right").await;

    let (status, _) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ADA@shop.test", "password": "right" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_empty_body_is_invalid_credentials() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/login", None, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_with_null_fields_is_invalid_credentials() {
    let app = TestApp::new();
    app.register("Ada", "ada@shop.test", "right").await;

    for body in [
        json!({ "email": null, "password": "right" }),
        json!({ "email": "ada@shop.test", "password": null }),
        json!({ "email": null, "password": null }),
    ] {
        let (status, response) = app.post("/api/login", None, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "message": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token, authorization denied" }));

    let (status, body) = app.get("/api/profile", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token is not valid" }));
}

#[tokio::test]
async fn test_profile_returns_caller_without_password() {
    let app = TestApp::new();
    let (token, user) = app.register("Ada", "ada@shop.test", "pw").await;

    let (status, body) = app.get("/api/profile", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user);
    assert_no_password(&body);
}

#[tokio::test]
async fn test_login_token_works_for_profile() {
    let app = TestApp::new();
    app.register("Ada", "ada@shop.test", "pw").await;

    let (_, login) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ada@shop.test", "password": "pw" }),
        )
        .await;
    let token = login["token"].as_str().unwrap();

    let (status, body) = app.get("/api/profile", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@shop.test");
}

#[tokio::test]
async fn test_real_argon2_register_then_login() {
    let app = TestApp::with_argon2();
    app.register("Ada", "ada@shop.test", "correct horse").await;

    let (ok, _) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ada@shop.test", "password": "correct horse" }),
        )
        .await;
    let (bad, _) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "ada@shop.test", "password": "battery staple" }),
        )
        .await;

    assert_eq!(ok, StatusCode::OK);
    assert_eq!(bad, StatusCode::BAD_REQUEST);
}
