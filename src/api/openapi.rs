//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::api::routes::{self, HealthResponse, ServiceStatus};
use crate::domain::{Profile, UserLevel, UserResponse};
use crate::types::{PaginationMeta, UserPage};

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "0.1.0",
        description = "User management REST API with Axum and SeaORM",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        routes::health,
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserLevel,
            Profile,
            UserResponse,
            UserPage,
            PaginationMeta,
            HealthResponse,
            ServiceStatus,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
        )
    ),
    tags(
        (name = "Users", description = "User management operations"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
