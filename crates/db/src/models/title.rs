//! Title entity model, read representation and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

use crate::models::catalog::CatalogEntry;

/// A row from the `titles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: Option<i32>,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A title row joined with its average review score.
#[derive(Debug, Clone, FromRow)]
pub struct TitleWithRating {
    pub id: DbId,
    pub name: String,
    pub year: Option<i32>,
    pub category_id: Option<DbId>,
    pub rating: Option<f64>,
}

/// Read representation returned by list/retrieve/create/update.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: Option<i32>,
    /// Mean review score; `None` while the title has no reviews.
    pub rating: Option<f64>,
    pub category: Option<CatalogEntry>,
    pub genre: Vec<CatalogEntry>,
}

/// DTO for `POST /titles`. Category and genres are referenced by slug.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTitle {
    pub name: String,
    pub year: Option<i32>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// DTO for `PATCH /titles/{id}`. All fields are optional; a present `genre`
/// replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// Insert payload with references already resolved to ids.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: Option<i32>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// Update payload with references already resolved to ids.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /titles`. Every filter is an exact match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
