//! Repository for the `titles` and `title_genres` tables.
//!
//! Reads return [`TitleDetail`], the title joined with its rating, category
//! and genres. Category and genre lookups for a page of titles are batched
//! into one query each.

use std::collections::HashMap;

use sqlx::PgPool;
use yamdb_core::pagination::{clamp_limit, clamp_offset};
use yamdb_core::types::DbId;

use crate::models::catalog::{CatalogEntry, CatalogKind};
use crate::models::title::{NewTitle, Title, TitleChanges, TitleDetail, TitleFilter, TitleWithRating};
use crate::repositories::CatalogRepo;

/// Column list for the `titles` table.
const COLUMNS: &str = "id, name, year, category_id, created_at, updated_at";

/// Title columns plus the aggregated review score. Expects the table alias `t`.
const RATED_COLUMNS: &str = "t.id, t.name, t.year, t.category_id, \
    (SELECT AVG(r.score)::FLOAT8 FROM reviews r WHERE r.title_id = t.id) AS rating";

/// Provides CRUD operations for titles and their genre links.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &NewTitle) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO titles (name, year, category_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&insert_query)
            .bind(&input.name)
            .bind(input.year)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.genre_ids.is_empty() {
            Self::set_genres_inner(&mut tx, title.id, &input.genre_ids).await?;
        }

        tx.commit().await?;
        Ok(title)
    }

    /// Find a bare title row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles WHERE id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a title by ID in its read representation.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let query = format!("SELECT {RATED_COLUMNS} FROM titles t WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleWithRating>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_relations(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List titles matching every filter that is set, ordered by ID.
    pub async fn list(pool: &PgPool, filter: &TitleFilter) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {RATED_COLUMNS} FROM titles t \
             LEFT JOIN categories c ON c.id = t.category_id \
             WHERE ($1::TEXT IS NULL OR c.slug = $1) \
               AND ($2::TEXT IS NULL OR EXISTS ( \
                     SELECT 1 FROM title_genres tg \
                     JOIN genres g ON g.id = tg.genre_id \
                     WHERE tg.title_id = t.id AND g.slug = $2)) \
               AND ($3::TEXT IS NULL OR t.name = $3) \
               AND ($4::INTEGER IS NULL OR t.year = $4) \
             ORDER BY t.id \
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleWithRating>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await?;

        Self::attach_relations(pool, rows).await
    }

    /// Update a title. Only non-`None` fields are applied.
    ///
    /// If `genre_ids` is `Some`, replaces all genre links.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TitleChanges,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE titles SET \
                name = COALESCE($2, name), \
                year = COALESCE($3, year), \
                category_id = COALESCE($4, category_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(input.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref title) = title {
            if let Some(ref genre_ids) = input.genre_ids {
                Self::set_genres_inner(&mut tx, title.id, genre_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(title)
    }

    /// Delete a title. Reviews and their comments cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Genre association helpers
    // -----------------------------------------------------------------------

    /// Genres for each of the given titles, keyed by title ID.
    pub async fn genres_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<CatalogEntry>>, sqlx::Error> {
        let mut map: HashMap<DbId, Vec<CatalogEntry>> = HashMap::new();
        if title_ids.is_empty() {
            return Ok(map);
        }

        let rows = sqlx::query_as::<_, (DbId, DbId, String, String)>(
            "SELECT tg.title_id, g.id, g.name, g.slug \
             FROM title_genres tg \
             JOIN genres g ON g.id = tg.genre_id \
             WHERE tg.title_id = ANY($1) \
             ORDER BY g.name, g.id",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await?;

        for (title_id, id, name, slug) in rows {
            map.entry(title_id)
                .or_default()
                .push(CatalogEntry { id, name, slug });
        }
        Ok(map)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Join category and genre entries onto a page of rated rows, keeping
    /// the input order.
    async fn attach_relations(
        pool: &PgPool,
        rows: Vec<TitleWithRating>,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let title_ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut category_ids: Vec<DbId> = rows.iter().filter_map(|r| r.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let categories: HashMap<DbId, CatalogEntry> =
            CatalogRepo::find_by_ids(pool, CatalogKind::Category, &category_ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();
        let mut genres = Self::genres_for_titles(pool, &title_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| TitleDetail {
                id: row.id,
                name: row.name,
                year: row.year,
                rating: row.rating,
                category: row.category_id.and_then(|id| categories.get(&id).cloned()),
                genre: genres.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Replace genre links within an existing transaction.
    async fn set_genres_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut **tx)
            .await?;

        for &genre_id in genre_ids {
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(title_id)
            .bind(genre_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
