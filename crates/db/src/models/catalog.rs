//! Category and genre models.
//!
//! Both catalogs share one row shape and one repository; [`CatalogKind`]
//! selects the table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::DbId;

/// Which catalog table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Genre,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::Genre => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            CatalogKind::Category => "Category",
            CatalogKind::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`.
///
/// The numeric id is internal; clients address entries by slug.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct CatalogEntry {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a catalog entry. A missing or empty `slug` is derived
/// from `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCatalogEntry {
    pub name: String,
    pub slug: Option<String>,
}

/// Query parameters for `GET /categories` and `GET /genres`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogListParams {
    /// Exact name match.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
