//! Parent lookups for nested resources.
//!
//! Review and comment routes carry their ancestors in the path. Each handler
//! resolves them top-down before touching the resource itself, so a missing
//! or mismatched ancestor is always a 404.

use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_db::models::review::Review;
use yamdb_db::models::title::Title;
use yamdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load the title named by `title_id`.
pub async fn resolve_title(state: &AppState, title_id: DbId) -> AppResult<Title> {
    TitleRepo::find_by_id(&state.pool, title_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Title", title_id)))
}

/// Load the review named by `review_id`, which must belong to `title_id`.
pub async fn resolve_review(state: &AppState, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    let title = resolve_title(state, title_id).await?;
    ReviewRepo::find_in_title(&state.pool, title.id, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Review", review_id)))
}
