//! Domain layer - Core business entities and logic
//!
//! Contains the user entity, its value objects, and the field rules
//! every inbound payload is checked against.

pub mod password;
pub mod user;
pub mod validation;

pub use password::Password;
pub use user::{NewUser, Profile, UnknownUserLevel, User, UserChanges, UserLevel, UserResponse};
