//! Error types for usagecsv
//!
//! This module defines the error types used throughout the usagecsv crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! The variants fall into three groups:
//! - configuration errors, raised before any I/O happens
//! - source errors, raised while paging through the provider's records
//! - filesystem errors, raised while creating or writing the output file
//!
//! None of them are retried; every error aborts the export.
//!
//! # Example
//!
//! ```
//! use usagecsv_core::error::{Result, UsagecsvError};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to UsagecsvError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for usagecsv operations
#[derive(Error, Debug)]
pub enum UsagecsvError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("API error (HTTP {status}{}): {message}", .code.map(|c| format!(", code {c}")).unwrap_or_default())]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider-specific error code, when the body carried one
        code: Option<u32>,
        /// Error message from the provider or the status reason
        message: String,
    },

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in usagecsv
///
/// # Example
///
/// ```
/// use usagecsv_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, UsagecsvError>;
