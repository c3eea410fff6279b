//! Error types for fleetcost

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Equipment not found: {0}")]
    NotFound(String),

    #[error("Equipment id already exists: {0}")]
    DuplicateId(String),

    #[error("Invalid import data: {0}")]
    InvalidImport(String),

    #[error("Storage write failed: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid equipment input: {0}")]
    Validation(String),
}

impl Error {
    /// True for failures of the durable store itself (as opposed to lookups)
    pub fn is_durability(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
