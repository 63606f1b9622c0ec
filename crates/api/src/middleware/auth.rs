//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Actor;
use yamdb_core::types::DbId;
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token only names the user; role and username are read from the
/// database on every request, so a deleted account stops authenticating.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    /// The user's current role (`user`, `moderator` or `admin`).
    pub role: String,
}

impl AuthUser {
    /// The identity as seen by the permission policy.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.user_id,
            role: self.role.clone(),
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("User not found"))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
