//! Domain rules for the YaMDb review service.
//!
//! Nothing in this crate touches the database or the network. The repository
//! and HTTP layers both depend on it.

pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod roles;
pub mod slug;
pub mod types;
pub mod validation;
