//! Request payload definitions backing the sales routes.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;

pub mod client;
#[cfg(feature = "server")]
pub mod documents;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("Malformed client data: {0}")]
    Malformed(String),
}

impl FormError {
    pub fn invalid(field: &'static str, source: TypeConstraintError) -> Self {
        FormError::InvalidField { field, source }
    }
}
