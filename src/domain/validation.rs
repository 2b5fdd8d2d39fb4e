//! Field-level validation rules shared by the request schemas.
//!
//! Each rule is a plain function so it can be plugged into
//! `#[validate(custom(...))]` and tested on its own.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::{
    is_valid_level, max_length_message, MAX_PROFILE_FIELD_LENGTH, MSG_INVALID_EMAIL,
    MSG_INVALID_LEVEL,
};

/// Local part, `@`, then at least two dot-separated labels with an alphabetic TLD.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email regex is valid")
});

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// True when `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercase a user level.
pub fn normalize_level(level: &str) -> String {
    level.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(error("email", MSG_INVALID_EMAIL))
    }
}

pub fn validate_user_level(level: &str) -> Result<(), ValidationError> {
    if is_valid_level(level) {
        Ok(())
    } else {
        Err(error("one_of", MSG_INVALID_LEVEL))
    }
}

pub fn validate_profile_field(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_PROFILE_FIELD_LENGTH {
        Err(error("length", max_length_message(MAX_PROFILE_FIELD_LENGTH)))
    } else {
        Ok(())
    }
}
