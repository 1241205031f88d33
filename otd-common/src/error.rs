//! Common error types for the On This Day bot

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for On This Day operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the catalog, configuration and workflow layers
///
/// Absence (no catalog yet, no date in a title, nothing recorded today) is
/// never reported through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be written or copied
    #[error("Failed to write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file exists but does not hold the expected document
    #[error("Catalog data corrupted in {}: {source}", path.display())]
    DataCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
