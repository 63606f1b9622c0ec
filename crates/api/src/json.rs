//! JSON body extractor that rejects with [`AppError`].
//!
//! Axum's own `Json` rejects with a plain-text body. [`ApiJson`] wraps it so
//! malformed or mistyped bodies produce the same `{error, code}` shape as
//! every other failure.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Deserialized JSON request body.
///
/// ```ignore
/// async fn create(ApiJson(input): ApiJson<CreateReview>) -> AppResult<...> { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}
