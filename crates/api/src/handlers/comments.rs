//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.
//!
//! Same access rules as reviews, with no uniqueness rule.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::permissions::{Policy, Target};
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_text;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::parents::resolve_review;
use crate::json::ApiJson;
use crate::middleware::rbac::Requester;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const POLICY: Policy = Policy::AUTHOR_OR_STAFF;

/// Load a comment through its title and review.
async fn resolve_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    let review = resolve_review(state, title_id, review_id).await?;
    CommentRepo::find_in_review(&state.pool, review.id, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Comment", comment_id)))
}

fn object(comment: &Comment) -> Target {
    Target::Object {
        owner: Some(comment.author_id),
    }
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let review = resolve_review(&state, title_id, review_id).await?;

    let comments =
        CommentRepo::list_by_review(&state.pool, review.id, params.limit, params.offset).await?;

    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ApiJson(input): ApiJson<CreateComment>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let author = req.user()?;
    let review = resolve_review(&state, title_id, review_id).await?;

    let mut errors = FieldErrors::new();
    errors.check("text", validate_text(&input.text));
    errors.into_result()?;

    let comment = CommentRepo::create(&state.pool, review.id, author.user_id, &input.text).await?;

    tracing::info!(
        comment_id = comment.id,
        review_id = review.id,
        user_id = author.user_id,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn get_comment(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let comment = resolve_comment(&state, title_id, review_id, comment_id).await?;
    req.authorize(&POLICY, object(&comment))?;

    Ok(Json(DataResponse { data: comment }))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn update_comment(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    ApiJson(input): ApiJson<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let comment = resolve_comment(&state, title_id, review_id, comment_id).await?;
    req.authorize(&POLICY, object(&comment))?;

    if let Some(text) = &input.text {
        let mut errors = FieldErrors::new();
        errors.check("text", validate_text(text));
        errors.into_result()?;
    }

    let updated = CommentRepo::update(&state.pool, comment.id, input.text.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Comment", comment_id)))?;

    tracing::info!(
        comment_id,
        review_id,
        user_id = req.user.as_ref().map(|u| u.user_id),
        "Comment updated",
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn delete_comment(
    req: Requester,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;
    let comment = resolve_comment(&state, title_id, review_id, comment_id).await?;
    req.authorize(&POLICY, object(&comment))?;

    let deleted = CommentRepo::delete(&state.pool, comment.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Comment", comment_id)));
    }

    tracing::info!(
        comment_id,
        review_id,
        user_id = req.user.as_ref().map(|u| u.user_id),
        "Comment deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
