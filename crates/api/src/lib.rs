//! YaMDb API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, mail
//! delivery) so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod json;
pub mod mail;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
