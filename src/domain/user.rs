//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::validate_profile_field;
use super::Password;
use crate::config::{LEVEL_ADMIN, LEVEL_USER};

/// User level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Admin,
    User,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Admin => LEVEL_ADMIN,
            UserLevel::User => LEVEL_USER,
        }
    }
}

/// Error for a string that names no user level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user level: {0}")]
pub struct UnknownUserLevel(pub String);

impl FromStr for UserLevel {
    type Err = UnknownUserLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LEVEL_ADMIN => Ok(UserLevel::Admin),
            LEVEL_USER => Ok(UserLevel::User),
            other => Err(UnknownUserLevel(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional contact details of a user.
///
/// Used both as stored state and, in [`UserChanges`], as a set of
/// fields to overwrite (`None` leaves the field untouched, so a stored
/// value can be replaced but never cleared).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Profile {
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "1 Infinite Loop")]
    pub address_1: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    pub address_2: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "Cupertino")]
    pub city: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "CA")]
    pub state: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "95014")]
    pub zip_code: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "USA")]
    pub country: Option<String>,
    #[validate(custom(function = "validate_profile_field"))]
    #[schema(example = "+1 408 996 1010")]
    pub phone: Option<String>,
}

impl Profile {
    /// Field name/value pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, &Option<String>); 9] {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address_1", &self.address_1),
            ("address_2", &self.address_2),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| value.is_none())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_level: UserLevel,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data for a user that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: Password,
    pub user_level: UserLevel,
    pub profile: Profile,
}

/// Validated partial update of a user.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<Password>,
    pub user_level: Option<UserLevel>,
    pub profile: Profile,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.user_level.is_none()
            && self.profile.is_empty()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "user")]
    pub user_level: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            user_level: user.user_level.to_string(),
            profile: user.profile,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_level_round_trip_names() {
        assert_eq!("admin".parse::<UserLevel>(), Ok(UserLevel::Admin));
        assert_eq!("user".parse::<UserLevel>(), Ok(UserLevel::User));
        assert!("someone".parse::<UserLevel>().is_err());
        assert_eq!(UserLevel::Admin.to_string(), "admin");
    }

    #[test]
    fn test_response_hides_password() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "a@b.com".to_string(),
            password_hash: "hash".to_string(),
            user_level: UserLevel::User,
            profile: Profile {
                city: Some("Austin".to_string()),
                ..Profile::default()
            },
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["user_level"], "user");
        assert_eq!(json["city"], "Austin");
        assert!(json["phone"].is_null());
    }

    #[test]
    fn test_profile_field_length_is_validated() {
        let profile = Profile {
            city: Some("x".repeat(256)),
            ..Profile::default()
        };
        let errors = profile.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("city"));

        let profile = Profile {
            city: Some("x".repeat(255)),
            ..Profile::default()
        };
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_changes_empty() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            user_level: Some(UserLevel::Admin),
            ..UserChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
