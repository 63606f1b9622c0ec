//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(rename = "review")]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub author: String,
    pub text: String,
    pub pub_date: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    pub text: Option<String>,
}
