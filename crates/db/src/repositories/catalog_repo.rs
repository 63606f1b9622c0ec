//! Repository for the `categories` and `genres` tables.
//!
//! The two tables share a schema, so every method takes a [`CatalogKind`]
//! that selects the table name.

use sqlx::PgPool;
use yamdb_core::pagination::{clamp_limit, clamp_offset};
use yamdb_core::types::DbId;

use crate::models::catalog::{CatalogEntry, CatalogKind, CatalogListParams};

/// Column list for catalog queries.
const COLUMNS: &str = "id, name, slug";

/// Provides create/list/delete for categories and genres.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a new entry. The slug must already be final.
    pub async fn create(
        pool: &PgPool,
        kind: CatalogKind,
        name: &str,
        slug: &str,
    ) -> Result<CatalogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// List entries ordered by name, optionally narrowed to one exact name.
    pub async fn list(
        pool: &PgPool,
        kind: CatalogKind,
        params: &CatalogListParams,
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE ($1::TEXT IS NULL OR name = $1) \
             ORDER BY name, id \
             LIMIT $2 OFFSET $3",
            table = kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(&params.search)
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Find an entry by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        kind: CatalogKind,
        slug: &str,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = $1",
            table = kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every entry whose slug is in `slugs`. Unknown slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: CatalogKind,
        slugs: &[String],
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = ANY($1) ORDER BY name, id",
            table = kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// Fetch every entry whose id is in `ids`.
    pub async fn find_by_ids(
        pool: &PgPool,
        kind: CatalogKind,
        ids: &[DbId],
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE id = ANY($1)",
            table = kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Delete an entry by slug.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: CatalogKind,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {table} WHERE slug = $1", table = kind.table());
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
