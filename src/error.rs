use thiserror::Error;

use crate::domain::{CategoryId, ProductId};
use crate::validation::FieldError;

/// Failure reported by any catalogue backend.
///
/// The edit session treats every variant the same way; the split only
/// matters for logs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogueError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),
    #[error("Photo not found for product {0}")]
    PhotoNotFound(ProductId),
    #[error("Catalogue rejected request: {0}")]
    Rejected(String),
    #[error("Catalogue transport error: {0}")]
    Transport(String),
    #[error("Invalid catalogue response: {0}")]
    InvalidResponse(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<reqwest::Error> for CatalogueError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogueError::InvalidResponse(e.to_string())
        } else {
            CatalogueError::Transport(e.to_string())
        }
    }
}

/// A user action blocked before any catalogue call was made.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Form is not valid: {}", describe(.0))]
    InvalidForm(Vec<FieldError>),
    #[error("Missing category")]
    MissingCategory,
    #[error("Product has not been saved yet")]
    MissingProduct,
    #[error("No photo selected")]
    MissingPhoto,
    #[error("No product is being edited")]
    NoActiveSession,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Service error: {0}")]
    Service(#[from] CatalogueError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
