//! Handlers for the `/titles` resource.
//!
//! Writes reference the category and genres by slug; the handlers resolve
//! slugs to ids before calling the repository and report unknown slugs as
//! field errors. Every response uses the read representation
//! ([`TitleDetail`]) with the rating attached.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::permissions::{Policy, Target};
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_name;
use yamdb_db::models::catalog::CatalogKind;
use yamdb_db::models::title::{
    CreateTitle, NewTitle, TitleChanges, TitleDetail, TitleFilter, UpdateTitle,
};
use yamdb_db::repositories::{CatalogRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::json::ApiJson;
use crate::middleware::rbac::Requester;
use crate::response::DataResponse;
use crate::state::AppState;

const POLICY: Policy = Policy::ADMIN_OR_READ_ONLY;

/// GET /api/v1/titles
///
/// Filters (`category`, `genre`, `name`, `year`) are exact matches and combine with AND.
pub async fn list_titles(
    req: Requester,
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;

    let titles = TitleRepo::list(&state.pool, &filter).await?;

    Ok(Json(DataResponse { data: titles }))
}

/// POST /api/v1/titles
pub async fn create_title(
    req: Requester,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTitle>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;

    let mut errors = FieldErrors::new();
    errors.check("name", validate_name(&input.name));
    let refs =
        resolve_references(&state, input.category.as_deref(), Some(&input.genre), &mut errors)
            .await?;
    errors.into_result()?;

    let new_title = NewTitle {
        name: input.name.trim().to_string(),
        year: input.year,
        category_id: refs.category_id,
        genre_ids: refs.genre_ids.unwrap_or_default(),
    };
    let title = TitleRepo::create(&state.pool, &new_title).await?;

    tracing::info!(title_id = title.id, name = %title.name, "Title created");

    let detail = load_detail(&state, title.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    req: Requester,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Object { owner: None })?;

    let detail = load_detail(&state, title_id).await?;

    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/titles/{id}
///
/// A present `genre` list replaces the title's genres. Omitted fields are
/// left unchanged.
pub async fn update_title(
    req: Requester,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ApiJson(input): ApiJson<UpdateTitle>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Object { owner: None })?;

    let mut errors = FieldErrors::new();
    if let Some(name) = &input.name {
        errors.check("name", validate_name(name));
    }
    let refs = resolve_references(
        &state,
        input.category.as_deref(),
        input.genre.as_deref(),
        &mut errors,
    )
    .await?;
    errors.into_result()?;

    let changes = TitleChanges {
        name: input.name.map(|n| n.trim().to_string()),
        year: input.year,
        category_id: refs.category_id,
        genre_ids: refs.genre_ids,
    };
    TitleRepo::update(&state.pool, title_id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Title", title_id)))?;

    tracing::info!(title_id, "Title updated");

    let detail = load_detail(&state, title_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/titles/{id}
///
/// Reviews and their comments are removed with the title.
pub async fn delete_title(
    req: Requester,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Object { owner: None })?;

    let deleted = TitleRepo::delete(&state.pool, title_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Title", title_id)));
    }

    tracing::info!(title_id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(state: &AppState, title_id: DbId) -> AppResult<TitleDetail> {
    TitleRepo::find_detail(&state.pool, title_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Title", title_id)))
}

/// Catalog references resolved from slugs.
#[derive(Debug, Default)]
struct References {
    category_id: Option<DbId>,
    genre_ids: Option<Vec<DbId>>,
}

/// Resolve a category slug and a genre slug list to ids, recording each
/// unknown slug in `errors`.
async fn resolve_references(
    state: &AppState,
    category: Option<&str>,
    genre: Option<&[String]>,
    errors: &mut FieldErrors,
) -> AppResult<References> {
    let mut refs = References::default();

    if let Some(slug) = category {
        match CatalogRepo::find_by_slug(&state.pool, CatalogKind::Category, slug).await? {
            Some(entry) => refs.category_id = Some(entry.id),
            None => errors.add("category", missing_slug(slug)),
        }
    }

    if let Some(slugs) = genre {
        let found = CatalogRepo::find_by_slugs(&state.pool, CatalogKind::Genre, slugs).await?;
        for slug in slugs {
            if !found.iter().any(|g| &g.slug == slug) {
                errors.add("genre", missing_slug(slug));
            }
        }
        refs.genre_ids = Some(found.into_iter().map(|g| g.id).collect());
    }

    Ok(refs)
}

fn missing_slug(slug: &str) -> String {
    format!("Object with slug={slug} does not exist.")
}
