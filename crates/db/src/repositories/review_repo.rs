//! Repository for the `reviews` table.
//!
//! Every read joins `users` so the row carries the author's username.
//! Writes wrap the statement in a CTE to return the same joined shape.

use sqlx::PgPool;
use yamdb_core::pagination::{clamp_limit, clamp_offset};
use yamdb_core::types::DbId;

use crate::models::review::Review;

/// Joined column list. Expects aliases `r` (reviews) and `u` (users).
const COLUMNS: &str = "r.id, r.title_id, r.author_id, u.username AS author, \
    r.text, r.score, r.created_at AS pub_date";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review, returning it with the author's username.
    ///
    /// Fails with a unique violation on `uq_reviews_author_title` if the
    /// author already reviewed this title.
    pub async fn create(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
        text: &str,
        score: i16,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "WITH r AS ( \
                 INSERT INTO reviews (title_id, author_id, text, score) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(author_id)
            .bind(text)
            .bind(score)
            .fetch_one(pool)
            .await
    }

    /// List the reviews of one title, oldest first.
    pub async fn list_by_title(
        pool: &PgPool,
        title_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id \
             WHERE r.title_id = $1 \
             ORDER BY r.created_at, r.id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Find a review by ID, scoped to its title. A review that belongs to
    /// another title is treated as missing.
    pub async fn find_in_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id \
             WHERE r.id = $1 AND r.title_id = $2"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `author_id` has already reviewed `title_id`.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// Update a review. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "WITH r AS ( \
                 UPDATE reviews SET \
                     text = COALESCE($2, text), \
                     score = COALESCE($3, score) \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(text)
            .bind(score)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review. Its comments cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
