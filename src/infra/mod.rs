//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Persistence traits and the user repository

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{BaseModel, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
