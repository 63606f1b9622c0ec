use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use yamdb_core::error::{CoreError, FieldErrors};

use crate::mail::MailError;

/// Message returned when an author reviews the same title twice.
pub const DUPLICATE_REVIEW: &str = "Object exist!";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yamdb_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Confirmation mail could not be delivered.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key, value } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with {key} {value} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::InvalidFields(fields) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                    Some(fields.clone()),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::NotAcceptable(msg) => {
                    (StatusCode::NOT_ACCEPTABLE, "NOT_ACCEPTABLE", msg.clone(), None)
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Delivery errors ---
            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery failed");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(fields) = fields {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

type Classified = (StatusCode, &'static str, String, Option<FieldErrors>);

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Field and message reported for each named unique constraint.
///
/// `None` as the field means the violation is reported without `fields`.
const UNIQUE_CONSTRAINTS: &[(&str, Option<&str>, &str)] = &[
    ("uq_reviews_author_title", None, DUPLICATE_REVIEW),
    (
        "uq_users_username",
        Some("username"),
        "A user with that username already exists.",
    ),
    (
        "uq_users_email",
        Some("email"),
        "A user with that email already exists.",
    ),
    (
        "uq_categories_slug",
        Some("slug"),
        "A category with this slug already exists.",
    ),
    (
        "uq_genres_slug",
        Some("slug"),
        "A genre with this slug already exists.",
    ),
];

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if let Some(classified) = classify_unique_violation(constraint) {
                    return classified;
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn classify_unique_violation(constraint: &str) -> Option<Classified> {
    if !constraint.starts_with("uq_") {
        return None;
    }

    let known = UNIQUE_CONSTRAINTS
        .iter()
        .find(|(name, _, _)| *name == constraint);

    Some(match known {
        Some((_, None, message)) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message.to_string(),
            None,
        ),
        Some((_, Some(field), message)) => {
            let mut fields = FieldErrors::new();
            fields.add(field, *message);
            (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(fields),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Duplicate value violates unique constraint: {constraint}"),
            None,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_review_constraint_maps_to_object_exist() {
        let (status, code, message, fields) =
            classify_unique_violation("uq_reviews_author_title").unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, DUPLICATE_REVIEW);
        assert!(fields.is_none());
    }

    #[test]
    fn username_constraint_reports_field() {
        let (status, _, _, fields) = classify_unique_violation("uq_users_username").unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(fields.unwrap().get("username").is_some());
    }

    #[test]
    fn unknown_uq_constraint_still_maps_to_400() {
        let (status, _, message, _) = classify_unique_violation("uq_other_thing").unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("uq_other_thing"));
    }

    #[test]
    fn non_uq_constraint_is_not_classified() {
        assert!(classify_unique_violation("users_pkey").is_none());
    }
}
