//! Application-wide error types using thiserror
//!
//! Startup and configuration failures are wrapped in AppError. Errors that
//! happen inside a tick (fetch, notification) have their own types in
//! `adapters::errors` and never escape the pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
