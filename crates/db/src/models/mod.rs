//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Query-parameter structs for the list endpoints

pub mod catalog;
pub mod comment;
pub mod review;
pub mod title;
pub mod user;
