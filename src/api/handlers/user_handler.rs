//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MSG_INVALID_LEVEL, MSG_MISSING_FIELD, MSG_PASSWORD_MISMATCH};
use crate::domain::validation::{
    normalize_email, normalize_level, validate_email, validate_user_level,
};
use crate::domain::{NewUser, Password, Profile, UserChanges, UserLevel, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams, UserPage};

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Email address, unique across users (case-insensitive)
    #[validate(
        required(message = "Missing data for required field."),
        custom(function = "validate_email")
    )]
    #[serde(default, deserialize_with = "normalized_email")]
    #[schema(value_type = String, example = "user@example.com")]
    pub email: Option<String>,
    /// Password (minimum 8 characters)
    #[validate(
        required(message = "Missing data for required field."),
        length(min = 8, message = "Shorter than minimum length 8.")
    )]
    #[serde(default)]
    #[schema(value_type = String, example = "SecurePass123!", min_length = 8)]
    pub password: Option<String>,
    /// Must repeat `password`
    #[validate(required(message = "Missing data for required field."))]
    #[serde(default)]
    #[schema(value_type = String, example = "SecurePass123!")]
    pub confirm_password: Option<String>,
    /// `admin` or `user`
    #[validate(
        required(message = "Missing data for required field."),
        custom(function = "validate_user_level")
    )]
    #[serde(default, deserialize_with = "normalized_level")]
    #[schema(value_type = String, example = "user")]
    pub user_level: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: Profile,
}

/// User update request; every field is optional.
///
/// An absent field and an explicit `null` both leave the stored value
/// unchanged, so a profile field cannot be cleared once it is set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_email"))]
    #[serde(default, deserialize_with = "normalized_email")]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Shorter than minimum length 8."))]
    #[serde(default)]
    pub password: Option<String>,
    /// Required when `password` is present
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[validate(custom(function = "validate_user_level"))]
    #[serde(default, deserialize_with = "normalized_level")]
    #[schema(example = "admin")]
    pub user_level: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: Profile,
}

fn normalized_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|email| normalize_email(&email)))
}

fn normalized_level<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|level| normalize_level(&level)))
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    value.ok_or_else(|| AppError::field(field, MSG_MISSING_FIELD))
}

fn parse_level(level: &str) -> AppResult<UserLevel> {
    level
        .parse()
        .map_err(|_| AppError::field("user_level", MSG_INVALID_LEVEL))
}

/// Hash `password` once `confirm` is known to match it.
fn confirmed_password(password: &str, confirm: Option<&str>) -> AppResult<Password> {
    match confirm {
        None => Err(AppError::field("confirm_password", MSG_MISSING_FIELD)),
        Some(confirm) if confirm != password => {
            Err(AppError::field("confirm_password", MSG_PASSWORD_MISMATCH))
        }
        Some(_) => Password::new(password),
    }
}

impl CreateUserRequest {
    /// Convert a validated request into a new user.
    pub fn into_new_user(self) -> AppResult<NewUser> {
        let email = required("email", self.email)?;
        let password = required("password", self.password)?;
        let user_level = parse_level(&required("user_level", self.user_level)?)?;
        let password = confirmed_password(&password, self.confirm_password.as_deref())?;

        Ok(NewUser {
            email,
            password,
            user_level,
            profile: self.profile,
        })
    }
}

impl UpdateUserRequest {
    /// Convert a validated request into a change set.
    pub fn into_changes(self) -> AppResult<UserChanges> {
        let password = match self.password.as_deref() {
            Some(password) => Some(confirmed_password(
                password,
                self.confirm_password.as_deref(),
            )?),
            None => None,
        };
        let user_level = self.user_level.as_deref().map(parse_level).transpose()?;

        Ok(UserChanges {
            email: self.email,
            password,
            user_level,
            profile: self.profile,
        })
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(payload.into_new_user()?)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users, one page at a time
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users ordered by ID", body = UserPage)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let page = params.page;
    let per_page = params.limit();
    let (users, total) = state.user_service.list_users(params).await?;

    Ok(Json(Paginated::new(
        users.into_iter().map(UserResponse::from).collect(),
        page,
        per_page,
        total,
    )))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update any subset of a user's fields
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Validation error or email already taken"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(id, payload.into_changes()?)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
