//! Error types for polarway-access — Railway Programming
//!
//! All operations return `Result<T, AccessError>`.
//! Collaborator failures travel through `?` unchanged.

use std::time::Duration;

use thiserror::Error;

use crate::types::AdminOperation;

/// Unified error type for early-access administration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    // ─── Authorization Errors ───

    #[error("You must sign in first")]
    Unauthenticated,

    #[error("You are not allowed to do this")]
    PermissionDenied,

    #[error("Too many requests for {operation}, retry in {}s", .retry_after.as_secs())]
    RateLimited {
        operation: AdminOperation,
        retry_after: Duration,
    },

    // ─── Directory Errors ───

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    // ─── Input Errors ───

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Unknown early access type: {0}")]
    InvalidAccessType(String),

    // ─── Infrastructure Errors ───

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// Stable machine-readable code, surfaced to API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "FORBIDDEN",
            Self::RateLimited { .. } => "TOO_MANY_REQUESTS",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            Self::InvalidEmail(_) | Self::InvalidAccessType(_) => "BAD_REQUEST",
            Self::ActorUnavailable(_) | Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Result type alias for access operations
pub type Result<T> = std::result::Result<T, AccessError>;
