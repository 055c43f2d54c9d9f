//! # AppError
//!
//! Centralized error handling for the LumiRead ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Club, Post, Book)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty club name, bad privacy value)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Operation is well-formed but disallowed by the target's state
    /// (e.g., joining a private club through the public-join path)
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Credential failure (e.g., bad login, missing or expired token)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (e.g., deleting another user's post)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate membership, taken username)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down, media store unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for LumiRead logic.
pub type Result<T> = std::result::Result<T, AppError>;
