//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, UserStore};
use crate::services::{UserManager, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the SeaORM-backed services onto an open database.
    pub fn from_database(database: Arc<Database>) -> Self {
        let repo = Arc::new(UserStore::new(database.get_connection()));
        let user_service = Arc::new(UserManager::new(repo));

        Self {
            user_service,
            database,
        }
    }
}
