use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pathfind_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Bookmark ID cannot be empty")]
    EmptyBookmarkId,
    #[error("Bookmark not found for id/prefix: {0}")]
    BookmarkNotFound(String),
    #[error("{0}")]
    AmbiguousBookmarkId(String),
    #[error("Nothing to save. Pass a URL or pipe text containing one on stdin.")]
    NothingToSave,
    #[error("No http:// or https:// URL found in: {0}")]
    NoUrlFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Profile '{0}' is not signed in. Run `pathfind auth login --api-key <key>` first.")]
    NotSignedIn(String),
}
