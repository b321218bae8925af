// --- File: crates/brobook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all BroBook errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for BroBookError.
#[derive(Error, Debug)]
pub enum BroBookError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BroBookError {
    fn status_code(&self) -> u16 {
        match self {
            BroBookError::ParseError(_) => 400,
            BroBookError::ConfigError(_) => 500,
            BroBookError::ValidationError(_) => 400,
            BroBookError::ConflictError(_) => 409,
            BroBookError::NotFoundError(_) => 404,
            BroBookError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<serde_json::Error> for BroBookError {
    fn from(err: serde_json::Error) -> Self {
        BroBookError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for BroBookError {
    fn from(err: std::io::Error) -> Self {
        BroBookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> BroBookError {
    BroBookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BroBookError {
    BroBookError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> BroBookError {
    BroBookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BroBookError {
    BroBookError::ConflictError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> BroBookError {
    BroBookError::InternalError(message.to_string())
}
