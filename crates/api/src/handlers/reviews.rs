//! Handlers for `/titles/{title_id}/reviews`.
//!
//! Reads are public. Writes need a token; updates and deletes are further
//! limited to the author, moderators and admins. An author may review each
//! title once.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::permissions::{Policy, Target};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_score, validate_text, DEFAULT_SCORE};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult, DUPLICATE_REVIEW};
use crate::handlers::parents::{resolve_review, resolve_title};
use crate::json::ApiJson;
use crate::middleware::rbac::Requester;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const POLICY: Policy = Policy::AUTHOR_OR_STAFF;

fn object(review: &Review) -> Target {
    Target::Object {
        owner: Some(review.author_id),
    }
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    req: Requester,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let title = resolve_title(&state, title_id).await?;

    let reviews =
        ReviewRepo::list_by_title(&state.pool, title.id, params.limit, params.offset).await?;

    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// The author comes from the token and the title from the path. A second
/// review by the same author on the same title is rejected with 400.
pub async fn create_review(
    req: Requester,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ApiJson(input): ApiJson<CreateReview>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let author = req.user()?;
    let title = resolve_title(&state, title_id).await?;

    let score = input.score.unwrap_or(DEFAULT_SCORE);
    let mut errors = FieldErrors::new();
    errors.check("text", validate_text(&input.text));
    errors.check("score", validate_score(score));
    errors.into_result()?;

    if ReviewRepo::exists_for_author(&state.pool, title.id, author.user_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            DUPLICATE_REVIEW.into(),
        )));
    }

    // A concurrent duplicate still trips uq_reviews_author_title, which the
    // error layer reports with the same message.
    let review =
        ReviewRepo::create(&state.pool, title.id, author.user_id, &input.text, score as i16)
            .await?;

    tracing::info!(
        review_id = review.id,
        title_id = title.id,
        user_id = author.user_id,
        score = review.score,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/titles/{title_id}/reviews/{id}
pub async fn get_review(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let review = resolve_review(&state, title_id, review_id).await?;
    req.authorize(&POLICY, object(&review))?;

    Ok(Json(DataResponse { data: review }))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{id}
pub async fn update_review(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ApiJson(input): ApiJson<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let review = resolve_review(&state, title_id, review_id).await?;
    req.authorize(&POLICY, object(&review))?;

    let mut errors = FieldErrors::new();
    if let Some(text) = &input.text {
        errors.check("text", validate_text(text));
    }
    if let Some(score) = input.score {
        errors.check("score", validate_score(score));
    }
    errors.into_result()?;

    let updated = ReviewRepo::update(
        &state.pool,
        review.id,
        input.text.as_deref(),
        input.score.map(|s| s as i16),
    )
    .await?
    .ok_or(AppError::Core(CoreError::not_found("Review", review_id)))?;

    tracing::info!(
        review_id,
        title_id,
        user_id = req.user.as_ref().map(|u| u.user_id),
        "Review updated",
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{id}
///
/// Comments on the review are removed with it.
pub async fn delete_review(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let review = resolve_review(&state, title_id, review_id).await?;
    req.authorize(&POLICY, object(&review))?;

    let deleted = ReviewRepo::delete(&state.pool, review.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Review", review_id)));
    }

    tracing::info!(
        review_id,
        title_id,
        user_id = req.user.as_ref().map(|u| u.user_id),
        "Review deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
