//! Thin wrapper over `reqwest` for calling the users endpoints.

use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;

/// Failure to reach the server or read its response.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status code and decoded body of a response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status_code: u16,
    body: Value,
}

impl ApiResponse {
    /// Decoded JSON body; `Null` for an empty body and a JSON string for
    /// a body that is not JSON.
    pub fn json(&self) -> &Value {
        &self.body
    }
}

/// Create-user call bound to a payload.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: Client,
    base_url: String,
    payload: Value,
}

impl UsersApi {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, payload: Value) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            payload,
        }
    }

    /// `POST /users` with the bound payload.
    pub async fn call(&self) -> Result<ApiResponse, ClientError> {
        self.send(Method::POST, "/users", Some(&self.payload)).await
    }

    /// `GET /users/{id}`
    pub async fn get(&self, id: i64) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, &format!("/users/{}", id), None).await
    }

    /// `PUT /users/{id}` with `changes` as the body.
    pub async fn update(&self, id: i64, changes: &Value) -> Result<ApiResponse, ClientError> {
        self.send(Method::PUT, &format!("/users/{}", id), Some(changes))
            .await
    }

    /// `DELETE /users/{id}`
    pub async fn delete(&self, id: i64) -> Result<ApiResponse, ClientError> {
        self.send(Method::DELETE, &format!("/users/{}", id), None)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status_code = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(%method, %url, status_code, "users api call");

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status_code, body })
    }
}
