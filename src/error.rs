//! Error module for the app-grid domain layer.

use thiserror::Error;

use crate::icon_grid::IconGridError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Icon grid layout error.
    #[error(transparent)]
    IconGrid(#[from] IconGridError),

    /// Other error.
    #[error("Domain error: {0}")]
    Other(String),
}
