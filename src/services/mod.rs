//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the repository trait, not on
//! SeaORM, so they can be tested against a mock.

mod user_service;

pub use user_service::{UserManager, UserService};
