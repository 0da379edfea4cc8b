//! Domain error type shared across the workspace
//!
//! Pure domain rules (cart arithmetic, address validation, status
//! transitions) report failures through [`DomainError`]. The server maps
//! these onto its HTTP error envelope at the handler boundary.

use thiserror::Error;

/// Errors produced by domain-level validation and state rules
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed a domain rule (blank field, bad quantity, bad price)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced line/record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A state-machine precondition was violated
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
