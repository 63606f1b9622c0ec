//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Confirmation codes live in `yamdb_core::confirmation`; they carry no I/O.

pub mod jwt;
