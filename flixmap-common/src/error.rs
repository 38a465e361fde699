//! Common error types for flixmap

use thiserror::Error;

/// Common result type for flixmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across flixmap crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalogue file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Boundary document could not be parsed
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Server-side fault not caused by the request
    #[error("Internal error: {0}")]
    Internal(String),
}
