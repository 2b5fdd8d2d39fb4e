//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;
use crate::types::PaginationParams;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user; the email must not be taken
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// List one page of users with the total count
    async fn list_users(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Apply a partial update
    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Delete user permanently
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService backed by a repository.
pub struct UserManager<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserManager<R> {
    /// Create new user service instance
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserService for UserManager<R> {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        if self.repo.find_by_email(&user.email).await?.is_some() {
            tracing::debug!(email = %user.email, "rejecting duplicate email");
            return Err(AppError::DuplicateEmail(user.email));
        }

        let created = self.repo.create(user).await?;
        tracing::info!(user_id = created.id, level = %created.user_level, "user created");
        Ok(created)
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.repo.list(&params).await
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let current = self.get_user(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(email) = changes.email.as_deref() {
            if email != current.email {
                if let Some(owner) = self.repo.find_by_email(email).await? {
                    if owner.id != id {
                        return Err(AppError::DuplicateEmail(email.to_string()));
                    }
                }
            }
        }

        let updated = self.repo.update(id, changes).await?;
        tracing::info!(user_id = id, "user updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{Password, Profile, UserLevel};
    use crate::infra::MockUserRepository;

    fn test_user(id: i32, email: &str) -> User {
        User {
            id,
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            user_level: UserLevel::User,
            profile: Profile::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: Password::from_hash("hashed".to_string()),
            user_level: UserLevel::Admin,
            profile: Profile::default(),
        }
    }

    fn service(repo: MockUserRepository) -> UserManager<MockUserRepository> {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "new@example.com")
            .returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|user| {
            let mut created = test_user(1, &user.email);
            created.user_level = user.user_level;
            Ok(created)
        });

        let user = service(repo)
            .create_user(new_user("new@example.com"))
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.user_level, UserLevel::Admin);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(test_user(3, email))));
        repo.expect_create().never();

        let err = service(repo)
            .create_user(new_user("taken@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(ref e) if e == "taken@example.com"));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get_user(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_update_user_rejects_email_of_other_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(test_user(id, "me@example.com"))));
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(test_user(2, email))));
        repo.expect_update().never();

        let changes = UserChanges {
            email: Some("other@example.com".to_string()),
            ..UserChanges::default()
        };
        let err = service(repo).update_user(1, changes).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_update_user_without_changes_skips_write() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, "me@example.com"))));
        repo.expect_update().never();

        let user = service(repo)
            .update_user(5, UserChanges::default())
            .await
            .unwrap();
        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn test_update_user_applies_changes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, "me@example.com"))));
        repo.expect_update().times(1).returning(|id, changes| {
            let mut user = test_user(id, "me@example.com");
            user.profile.city = changes.profile.city;
            Ok(user)
        });

        let changes = UserChanges {
            profile: Profile {
                city: Some("Lisbon".to_string()),
                ..Profile::default()
            },
            ..UserChanges::default()
        };
        let user = service(repo).update_user(9, changes).await.unwrap();
        assert_eq!(user.profile.city.as_deref(), Some("Lisbon"));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let err = service(repo).delete_user(8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().returning(|_| {
            Ok((
                vec![test_user(1, "a@example.com"), test_user(2, "b@example.com")],
                2,
            ))
        });

        let (users, total) = service(repo)
            .list_users(PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(total, 2);
    }
}
