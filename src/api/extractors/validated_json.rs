//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::config::MSG_MISSING_FIELD;
use crate::errors::{AppError, FieldErrors};

/// Validated JSON extractor that automatically validates requests.
///
/// A body that is not JSON, or does not match the request type, is
/// rejected as a bad request with the rejection text. Rule violations
/// are reported per field.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use users_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct RenameRequest {
///     #[validate(length(min = 1))]
///     first_name: String,
/// }
///
/// async fn rename(ValidatedJson(payload): ValidatedJson<RenameRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Collect the messages of every failed rule, keyed by field name.
///
/// Errors of nested structs are merged into the top level, since nested
/// request parts are flattened into the same JSON object.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    collect(errors, &mut fields);
    fields
}

fn collect(errors: &ValidationErrors, fields: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = fields.entry(field.to_string()).or_default();
                messages.extend(errs.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(e.code.as_ref()))
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, fields),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect(nested, fields);
                }
            }
        }
    }
}

fn default_message(code: &str) -> String {
    match code {
        "required" => MSG_MISSING_FIELD.to_string(),
        other => format!("Failed rule '{}'.", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(required(message = "Missing data for required field."))]
        name: Option<String>,
        #[validate(length(min = 3))]
        code: String,
        #[validate(nested)]
        profile: Profile,
    }

    #[test]
    fn test_field_errors_flatten_nested_structs() {
        let sample = Sample {
            name: None,
            code: "ab".to_string(),
            profile: Profile {
                phone: Some("9".repeat(300)),
                ..Profile::default()
            },
        };

        let fields = field_errors(&sample.validate().unwrap_err());
        assert_eq!(fields["name"], vec![MSG_MISSING_FIELD.to_string()]);
        assert_eq!(fields["code"], vec!["Failed rule 'length'.".to_string()]);
        assert_eq!(
            fields["phone"],
            vec!["Longer than maximum length 255.".to_string()]
        );
        assert!(!fields.contains_key("profile"));
    }
}
