//! Error type for domain-level validation failures.

/// Errors produced by domain validation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A value failed domain validation (empty equipment id, unknown
    /// variable name, etc.).
    #[error("Validation error: {0}")]
    Validation(String),
}
