use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with {key} {value}")]
    NotFound {
        entity: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidFields(FieldErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not acceptable: {0}")]
    NotAcceptable(String),
}

impl CoreError {
    /// Not-found error for a lookup by numeric primary key.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            key: "id",
            value: id.to_string(),
        }
    }

    /// Not-found error for a lookup by a natural key such as a slug or username.
    pub fn not_found_by(entity: &'static str, key: &'static str, value: &str) -> Self {
        CoreError::NotFound {
            entity,
            key,
            value: value.to_string(),
        }
    }
}

/// Field-level validation messages, keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the error from a field validator, if any.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise [`CoreError::InvalidFields`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
