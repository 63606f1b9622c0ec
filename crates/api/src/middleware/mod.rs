//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Loads the authenticated user from a JWT Bearer token.
//! - [`rbac::Requester`] -- Optional identity plus request action, checked
//!   against a `yamdb_core::permissions::Policy`.

pub mod auth;
pub mod rbac;
