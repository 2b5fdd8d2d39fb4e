//! Users API - user management REST service
//!
//! CRUD over users stored through SeaORM, with field-level validation of
//! every write and an HTTP client for exercising the endpoints.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, passwords and validation rules
//! - **services**: Application use cases
//! - **infra**: Database, migrations and persistence traits
//! - **api**: HTTP handlers, extractors and routes
//! - **client**: HTTP client for the users endpoints
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Password, User, UserLevel};
pub use errors::{AppError, AppResult};
pub use infra::Database;
