//! Review entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A review row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(rename = "title")]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author's username.
    pub author: String,
    pub text: String,
    pub score: i16,
    pub pub_date: Timestamp,
}

/// DTO for creating a review. Author and title come from the request context.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub text: String,
    /// Defaults to 5 if omitted.
    pub score: Option<i32>,
}

/// DTO for updating a review. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}
