//! Domain errors shared by the module stores.
//!
//! Stores speak [`StoreError`]; route handlers convert into the HTTP-facing
//! [`AppError`] through the single `From` impl below, so the status mapping
//! lives in exactly one place.

use serde_json::json;
use thiserror::Error;

use bookshelf_http::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A request field failed validation. `field` names the offending input.
    #[error("{message}")]
    InvalidInput { field: String, message: String },

    #[error("{message}")]
    NotFound { message: String },

    /// Registration attempted with an email that is already taken.
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput { field, message } => {
                AppError::invalid_input(vec![json!({"field": field, "error": &message})], message)
            }
            StoreError::NotFound { message } => AppError::not_found(message),
            StoreError::DuplicateEmail => AppError::duplicate_email("Email already exists"),
            StoreError::Conflict { message } => AppError::conflict(message),
            StoreError::Db(err) => AppError::Internal(anyhow::Error::new(err)),
            StoreError::Internal(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn invalid_input_maps_to_400_with_field_detail() {
        let err: AppError = StoreError::invalid_input("title", "Title must not be blank").into();

        match &err {
            AppError::InvalidInput {
                details, message, ..
            } => {
                assert_eq!(message, "Title must not be blank");
                assert_eq!(details[0]["field"], "title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.into_response().status(), 400);
    }

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases: Vec<(StoreError, u16)> = vec![
            (StoreError::not_found("Not Found"), 404),
            (StoreError::DuplicateEmail, 409),
            (StoreError::conflict("Favorite already exists"), 409),
            (StoreError::Internal(anyhow::anyhow!("boom")), 500),
        ];

        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.into_response().status(), status);
        }
    }
}
