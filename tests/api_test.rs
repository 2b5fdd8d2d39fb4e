//! Integration tests for the user CRUD endpoints.
//!
//! Each test drives the router directly with `oneshot` over its own
//! in-memory SQLite database.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use users_api::client::UserPayload;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

async fn create_user(app: &Router, payload: &UserPayload) -> Value {
    let (status, body) = send(app, Method::POST, "/users", Some(payload.json())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = common::test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = common::test_app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/users/{id}"].is_object());
}

#[tokio::test]
async fn test_get_user() {
    let app = common::test_app().await;
    let payload = UserPayload::sample();
    let created = create_user(&app, &payload).await;

    let uri = format!("/users/{}", created["id"]);
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], payload.json()["email"]);
    assert_eq!(body["phone"], payload.json()["phone"]);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_missing_user() {
    let app = common::test_app().await;
    let (status, body) = send(&app, Method::GET, "/users/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
}

#[tokio::test]
async fn test_list_users_is_paginated() {
    let app = common::test_app().await;
    for _ in 0..3 {
        create_user(&app, &UserPayload::sample()).await;
    }

    let (status, body) = send(&app, Method::GET, "/users?page=2&per_page=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], 3);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);
}

#[tokio::test]
async fn test_update_user_partially() {
    let app = common::test_app().await;
    let payload = UserPayload::sample();
    let created = create_user(&app, &payload).await;
    let uri = format!("/users/{}", created["id"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "city": "Lisbon", "user_level": "ADMIN" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Lisbon");
    assert_eq!(body["user_level"], "admin");
    assert_eq!(body["email"], payload.json()["email"]);
    assert_eq!(body["first_name"], payload.json()["first_name"]);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["city"], "Lisbon");
}

#[tokio::test]
async fn test_update_null_keeps_stored_value() {
    let app = common::test_app().await;
    let payload = UserPayload::sample();
    let created = create_user(&app, &payload).await;
    let uri = format!("/users/{}", created["id"]);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "city": null }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], payload.json()["city"]);
}

#[tokio::test]
async fn test_update_validates_fields() {
    let app = common::test_app().await;
    let created = create_user(&app, &UserPayload::sample()).await;
    let uri = format!("/users/{}", created["id"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "not-an-email", "user_level": "root" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"]["email"][0], "Not a valid email address.");
    assert_eq!(body["message"]["user_level"][0], "Must be one of: admin, user.");
}

#[tokio::test]
async fn test_update_rejects_email_of_other_user() {
    let app = common::test_app().await;
    let first = UserPayload::sample();
    create_user(&app, &first).await;
    let second = create_user(&app, &UserPayload::sample()).await;

    let uri = format!("/users/{}", second["id"]);
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": first.email().unwrap() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        format!("User with email '{}' already exists.", first.email().unwrap())
    );
}

#[tokio::test]
async fn test_update_missing_user() {
    let app = common::test_app().await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/users/42",
        Some(json!({ "city": "Nowhere" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let app = common::test_app().await;
    let created = create_user(&app, &UserPayload::sample()).await;
    let uri = format!("/users/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = common::test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}
