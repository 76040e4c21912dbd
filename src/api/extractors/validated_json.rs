//! JSON extractor that validates the payload before the handler runs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Deserialize the request body and run its `validator` rules.
///
/// Handlers receive a payload that already satisfies its declared
/// constraints; malformed bodies and failed rules both surface as a
/// validation error response.
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
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn formats_messages_from_field_errors() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("Password must be at least 8 characters".into());
        errors.add("password", err);

        let rendered = format_validation_errors(&errors);
        assert_eq!(rendered, "Password must be at least 8 characters");
    }

    #[test]
    fn falls_back_to_field_name_without_message() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("email", ValidationError::new("email"));

        let rendered = format_validation_errors(&errors);
        assert_eq!(rendered, "email is invalid");
    }
}
