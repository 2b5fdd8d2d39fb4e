//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use users_api::{create_router, AppState, Database};

/// Router over a fresh in-memory database.
pub async fn test_app() -> Router {
    let db = Database::in_memory()
        .await
        .expect("in-memory database should start");
    create_router(AppState::from_database(Arc::new(db)))
}

/// Base URL of the server under test.
///
/// Uses `USERS_API_URL` when set, otherwise serves a fresh router on an
/// ephemeral local port for the lifetime of the test runtime.
pub async fn base_url() -> String {
    if let Ok(url) = std::env::var("USERS_API_URL") {
        return url;
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener has an address");
    let app = test_app().await;
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    format!("http://{}", addr)
}
