//! Handlers for the `/categories` and `/genres` resources.
//!
//! Both catalogs expose list, create and delete-by-slug. The shared logic
//! takes a [`CatalogKind`]; the per-route functions below only pick the kind.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::permissions::{Policy, Target};
use yamdb_core::slug::{generate_slug, validate_slug};
use yamdb_core::validation::validate_name;
use yamdb_db::models::catalog::{CatalogKind, CatalogListParams, CreateCatalogEntry};
use yamdb_db::repositories::CatalogRepo;

use crate::error::{AppError, AppResult};
use crate::json::ApiJson;
use crate::middleware::rbac::Requester;
use crate::response::DataResponse;
use crate::state::AppState;

const POLICY: Policy = Policy::ADMIN_OR_READ_ONLY;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
pub async fn list_categories(
    req: Requester,
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<impl IntoResponse> {
    list_entries(CatalogKind::Category, &req, &state, &params).await
}

/// POST /api/v1/categories
pub async fn create_category(
    req: Requester,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCatalogEntry>,
) -> AppResult<impl IntoResponse> {
    create_entry(CatalogKind::Category, &req, &state, input).await
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles in this category keep existing with no category.
pub async fn delete_category(
    req: Requester,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    delete_entry(CatalogKind::Category, &req, &state, &slug).await
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/v1/genres
pub async fn list_genres(
    req: Requester,
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<impl IntoResponse> {
    list_entries(CatalogKind::Genre, &req, &state, &params).await
}

/// POST /api/v1/genres
pub async fn create_genre(
    req: Requester,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCatalogEntry>,
) -> AppResult<impl IntoResponse> {
    create_entry(CatalogKind::Genre, &req, &state, input).await
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre(
    req: Requester,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    delete_entry(CatalogKind::Genre, &req, &state, &slug).await
}

// ---------------------------------------------------------------------------
// Shared implementation
// ---------------------------------------------------------------------------

async fn list_entries(
    kind: CatalogKind,
    req: &Requester,
    state: &AppState,
    params: &CatalogListParams,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;

    let entries = CatalogRepo::list(&state.pool, kind, params).await?;

    Ok(Json(DataResponse { data: entries }))
}

async fn create_entry(
    kind: CatalogKind,
    req: &Requester,
    state: &AppState,
    input: CreateCatalogEntry,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Collection)?;

    let slug = resolve_slug(&input)?;
    let entry = CatalogRepo::create(&state.pool, kind, input.name.trim(), &slug).await?;

    tracing::info!(
        kind = kind.table(),
        slug = %entry.slug,
        user_id = req.user.as_ref().map(|u| u.user_id),
        "Catalog entry created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

async fn delete_entry(
    kind: CatalogKind,
    req: &Requester,
    state: &AppState,
    slug: &str,
) -> AppResult<impl IntoResponse> {
    req.authorize(&POLICY, Target::Object { owner: None })?;

    let deleted = CatalogRepo::delete_by_slug(&state.pool, kind, slug).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found_by(
            kind.entity(),
            "slug",
            slug,
        )));
    }

    tracing::info!(kind = kind.table(), slug, "Catalog entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Validate the name and settle the slug: the explicit one when given,
/// otherwise one derived from the name.
fn resolve_slug(input: &CreateCatalogEntry) -> Result<String, CoreError> {
    let mut errors = FieldErrors::new();
    errors.check("name", validate_name(input.name.trim()));

    let explicit = input
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let slug = match explicit {
        Some(slug) => {
            errors.check("slug", validate_slug(slug));
            slug.to_string()
        }
        None => {
            let derived = generate_slug(input.name.trim());
            if derived.is_empty() && errors.get("name").is_none() {
                errors.add("slug", "Could not derive a slug from the name; provide one.");
            }
            derived
        }
    };

    errors.into_result()?;
    Ok(slug)
}
