//! Error types for pathfind-core

use thiserror::Error;

/// Result type alias using pathfind-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pathfind-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid or missing client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential persistence error
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_renders_message_and_status() {
        let error = Error::Api {
            status: 404,
            message: "Bookmark not found".to_string(),
        };
        assert_eq!(error.to_string(), "Bookmark not found (404)");
    }
}
