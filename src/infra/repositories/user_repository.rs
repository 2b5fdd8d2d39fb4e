//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use serde_json::json;

use super::base::{ColumnMap, DeleteRepository, ReadRepository, WriteRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model as UserModel};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by (normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a partial update to an existing user
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Delete a user; `false` when no such user exists
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// One page of users ordered by ID, with the total user count
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<UserEntity, UserModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<UserEntity, UserModel, ActiveModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<UserEntity, UserModel, ActiveModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Map storage failures that have a user-facing meaning.
fn translate(err: AppError, email: Option<&str>) -> AppError {
    match err {
        AppError::Database(DbErr::RecordNotFound(_)) => AppError::NotFound,
        AppError::Database(db_err) => match (db_err.sql_err(), email) {
            (Some(SqlErr::UniqueConstraintViolation(_)), Some(email)) => {
                AppError::DuplicateEmail(email.to_string())
            }
            _ => AppError::Database(db_err),
        },
        other => other,
    }
}

/// Column updates described by `changes`, stamped with a new `updated_at`.
fn change_set(changes: UserChanges) -> ColumnMap {
    let mut data = ColumnMap::new();
    if let Some(email) = changes.email {
        data.insert("email".to_string(), json!(email));
    }
    if let Some(password) = changes.password {
        data.insert("password_hash".to_string(), json!(password.into_string()));
    }
    if let Some(level) = changes.user_level {
        data.insert("user_level".to_string(), json!(level.as_str()));
    }
    for (name, value) in changes.profile.entries() {
        if let Some(value) = value {
            data.insert(name.to_string(), json!(value));
        }
    }
    data.insert("updated_at".to_string(), json!(chrono::Utc::now()));
    data
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        ReadRepository::<UserEntity, UserModel>::find_by_id(self, id)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let profile = new_user.profile;
        let email = new_user.email;
        let active_model = ActiveModel {
            id: NotSet,
            email: Set(email.clone()),
            password_hash: Set(new_user.password.into_string()),
            user_level: Set(new_user.user_level.as_str().to_string()),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            address_1: Set(profile.address_1),
            address_2: Set(profile.address_2),
            city: Set(profile.city),
            state: Set(profile.state),
            zip_code: Set(profile.zip_code),
            country: Set(profile.country),
            phone: Set(profile.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = WriteRepository::save(self, active_model)
            .await
            .map_err(|e| translate(e, Some(&email)))?;
        User::try_from(model)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let email = changes.email.clone();
        let model = WriteRepository::<UserEntity, UserModel, ActiveModel>::update(
            self,
            id,
            change_set(changes),
        )
        .await
        .map_err(|e| translate(e, email.as_deref()))?;
        User::try_from(model)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let Some(model) = ReadRepository::<UserEntity, UserModel>::find_by_id(self, id).await?
        else {
            return Ok(false);
        };

        let removed = DeleteRepository::<UserEntity, UserModel, ActiveModel>::delete(self, model)
            .await?;
        Ok(removed > 0)
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let (models, total) =
            ReadRepository::<UserEntity, UserModel>::find_paginated(self, params).await?;
        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }
}
