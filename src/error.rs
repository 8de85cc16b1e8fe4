//! Application error types for ethscription-scout
//!
//! This module defines the error types shared across the crate.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by the upstream ethscriptions API
///
/// Every variant is treated as transient by the retry layer; a finite
/// retry policy is the only way one of these reaches a caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Network timeout
    #[error("Network timeout")]
    NetworkTimeout,

    /// Connection refused
    #[error("Connection refused")]
    ConnectionRefused,

    /// Rate limited by upstream
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Server error
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// Response body could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Resource not found
    #[error("Resource not found")]
    NotFound,

    /// Unauthorized
    #[error("Unauthorized")]
    Unauthorized,

    /// Generic network error
    #[error("Network error: {0}")]
    Network(String),
}

/// Input validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Range end lies before its start
    #[error("Invalid range: end {end} is less than start {start}")]
    InvalidRange {
        /// Requested start
        start: u64,
        /// Requested end
        end: u64,
    },

    /// Range covers more identifiers than one scan accepts
    #[error("Range of {len} ids exceeds the maximum of {max}")]
    RangeTooLarge {
        /// Identifiers covered, saturating at `u64::MAX`
        len: u64,
        /// Largest accepted span
        max: u64,
    },

    /// Selected count is outside `1..=available`
    #[error("Invalid count {count}: must be between 1 and {available}")]
    InvalidCount {
        /// Requested count
        count: usize,
        /// Number of selectable items
        available: usize,
    },

    /// Concurrency cap of zero
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    /// Template is missing the `${id}` marker
    #[error("Template has no ${{id}} marker: {0}")]
    MissingIdMarker(String),
}

/// Application-level error type
///
/// This is the main error type used throughout the application.
/// It aggregates all domain-specific error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run stopped by an interrupt signal before it finished
    #[error("Interrupted before completion")]
    Interrupted,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
