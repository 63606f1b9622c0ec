//! Policy-based access control extractor.
//!
//! [`Requester`] replaces per-role extractors: every handler receives the
//! optional identity and the action implied by the HTTP method, then checks
//! a named [`Policy`] against a collection or a specific object.
//!
//! ```ignore
//! async fn delete_review(req: Requester, ...) -> AppResult<StatusCode> {
//!     req.authorize(&Policy::AUTHOR_OR_STAFF, Target::Collection)?;
//!     let review = resolve_review(&state, title_id, review_id).await?;
//!     req.authorize(&Policy::AUTHOR_OR_STAFF, Target::Object { owner: Some(review.author_id) })?;
//!     ...
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Policy, Target};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The caller of a request: possibly anonymous, always with an action.
///
/// A request without an `Authorization` header is anonymous. A request with
/// a header that fails to authenticate is rejected with 401 rather than
/// downgraded to anonymous.
#[derive(Debug, Clone)]
pub struct Requester {
    pub user: Option<AuthUser>,
    pub action: Action,
}

impl Requester {
    /// Check `policy` for this caller against `target`.
    pub fn authorize(&self, policy: &Policy, target: Target) -> AppResult<()> {
        let actor = self.user.as_ref().map(AuthUser::actor);
        policy.check(actor.as_ref(), self.action, target)?;
        Ok(())
    }

    /// The authenticated user, or 401 for anonymous callers.
    pub fn user(&self) -> AppResult<&AuthUser> {
        self.user.as_ref().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided.".into(),
            ))
        })
    }
}

impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let action = Action::from_method(parts.method.as_str());

        let user = if parts.headers.contains_key(AUTHORIZATION) {
            Some(AuthUser::from_request_parts(parts, state).await?)
        } else {
            None
        };

        Ok(Requester { user, action })
    }
}
