//! Application route configuration.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::user_routes;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/users", user_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Users API"
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub database: ServiceStatus,
}

/// Status of one backing service
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatus {
    #[schema(example = "healthy")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check with database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, database) = match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            ServiceStatus {
                status: "healthy".to_string(),
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ServiceStatus {
                    status: "unhealthy".to_string(),
                    error: Some(e.to_string()),
                },
            )
        }
    };

    let response = HealthResponse {
        status: database.status.clone(),
        database,
    };

    (status_code, Json(response))
}
