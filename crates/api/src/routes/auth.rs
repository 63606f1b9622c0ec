//! Route definitions for `/auth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Public authentication routes mounted at `/auth`.
///
/// ```text
/// POST   /email    -> email_code
/// POST   /token    -> get_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email", post(auth::email_code))
        .route("/token", post(auth::get_token))
}
