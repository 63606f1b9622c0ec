//! Repository for the `users` table.

use sqlx::PgPool;
use yamdb_core::pagination::{clamp_limit, clamp_offset};
use yamdb_core::roles::ROLE_ADMIN;
use yamdb_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateUser, User, UserListParams};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, \
                        last_login_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, bio, role)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, ''),
                     COALESCE($6, 'user'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by username, optionally narrowed to one exact username.
    pub async fn list(pool: &PgPool, params: &UserListParams) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR username = $1)
             ORDER BY username
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&params.search)
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Their reviews and comments go with them.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `last_login_at` to now, provided it still equals `expected`.
    ///
    /// Confirmation codes are bound to this column, so a successful call
    /// invalidates every code issued before it. Returns `false` when another
    /// login got there first.
    pub async fn record_login(
        pool: &PgPool,
        id: DbId,
        expected: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET last_login_at = NOW()
             WHERE id = $1 AND last_login_at IS NOT DISTINCT FROM $2",
        )
        .bind(id)
        .bind(expected)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Make sure a user with this email exists and holds the admin role.
    ///
    /// A new account uses the email as its username.
    pub async fn ensure_admin(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, role)
             VALUES ($1, $1, $2)
             ON CONFLICT ON CONSTRAINT uq_users_email DO UPDATE SET role = EXCLUDED.role
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(ROLE_ADMIN)
            .fetch_one(pool)
            .await
    }
}
