//! HTTP client for the users endpoints.
//!
//! [`UsersApi`] posts a payload to `POST /users` and hands back the status
//! and JSON body; [`UserPayload`] builds complete or deliberately broken
//! create-user payloads.

mod payload;
mod users_api;

pub use payload::UserPayload;
pub use users_api::{ApiResponse, ClientError, UsersApi};
