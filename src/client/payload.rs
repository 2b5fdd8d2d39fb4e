//! Create-user payload fixture.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::config::{LEVEL_USER, PROFILE_FIELDS};

/// A create-user request body that tests can take apart field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPayload {
    fields: Map<String, Value>,
}

impl UserPayload {
    /// A valid payload with every field set and a unique email address.
    pub fn sample() -> Self {
        let email = format!("user-{}@example.com", Uuid::new_v4().simple());
        let body = json!({
            "email": email,
            "password": "s3cret-pass",
            "confirm_password": "s3cret-pass",
            "user_level": LEVEL_USER,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "address_1": "12 St James's Square",
            "address_2": "Flat 2",
            "city": "London",
            "state": "Westminster",
            "zip_code": "SW1Y 4JH",
            "country": "UK",
            "phone": "+44 20 7946 0000"
        });

        match body {
            Value::Object(fields) => Self { fields },
            _ => Self { fields: Map::new() },
        }
    }

    /// Set `field` to `value`, adding it when absent.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Drop `field` from the payload.
    pub fn remove(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    pub fn remove_attributes(self, fields: &[&str]) -> Self {
        fields.iter().fold(self, |payload, field| payload.remove(field))
    }

    /// Drop every optional profile field.
    pub fn without_profile(self) -> Self {
        self.remove_attributes(PROFILE_FIELDS)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// The payload as a JSON object.
    pub fn json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl Default for UserPayload {
    fn default() -> Self {
        Self::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_emails_are_unique() {
        assert_ne!(UserPayload::sample().email(), UserPayload::sample().email());
    }

    #[test]
    fn test_remove_and_set() {
        let payload = UserPayload::sample()
            .remove("email")
            .set("user_level", "admin");

        assert!(payload.get("email").is_none());
        assert_eq!(payload.json()["user_level"], "admin");
    }

    #[test]
    fn test_without_profile_keeps_required_fields() {
        let json = UserPayload::sample().without_profile().json();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        for field in ["email", "password", "confirm_password", "user_level"] {
            assert!(object.contains_key(field));
        }
    }
}
