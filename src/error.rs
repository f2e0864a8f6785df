//! Error types for repository listing and GitHub access

use std::path::PathBuf;
use thiserror::Error;

/// Result type for listing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing the repository list
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication error (missing or unusable token)
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// A starred-listing page returned a non-success status.
    /// Aborts the whole listing; there are no partial results.
    #[error("GitHub API error on page {page}: status {status}: {body}")]
    ApiPage { page: u32, status: u16, body: String },

    /// Repos list file does not exist
    #[error("Repos file not found: {0}")]
    RepoFileNotFound(PathBuf),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error reading the repos file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
