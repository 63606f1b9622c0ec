//! Repository for the `comments` table.

use sqlx::PgPool;
use yamdb_core::pagination::{clamp_limit, clamp_offset};
use yamdb_core::types::DbId;

use crate::models::comment::Comment;

/// Joined column list. Expects aliases `c` (comments) and `u` (users).
const COLUMNS: &str = "c.id, c.review_id, c.author_id, u.username AS author, \
    c.text, c.created_at AS pub_date";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment, returning it with the author's username.
    pub async fn create(
        pool: &PgPool,
        review_id: DbId,
        author_id: DbId,
        text: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS ( \
                 INSERT INTO comments (review_id, author_id, text) \
                 VALUES ($1, $2, $3) \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(author_id)
            .bind(text)
            .fetch_one(pool)
            .await
    }

    /// List the comments of one review, oldest first.
    pub async fn list_by_review(
        pool: &PgPool,
        review_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.review_id = $1 \
             ORDER BY c.created_at, c.id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Find a comment by ID, scoped to its review.
    pub async fn find_in_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.id = $1 AND c.review_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a comment's text when one is given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        text: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH c AS ( \
                 UPDATE comments SET text = COALESCE($2, text) \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
