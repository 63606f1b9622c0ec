//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Carries `last_login_at`, which confirmation codes are bound to. Use
/// [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User representation shared by `/users` and `/users/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// DTO for creating a new user. Omitted profile fields default to empty,
/// an omitted role to `user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// Query parameters for `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListParams {
    /// Exact username match.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
