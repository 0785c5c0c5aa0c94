//! Source error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching a question bank.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The bank file or URL does not exist.
    #[error("question bank not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    /// The request did not complete in time.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The bank could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
