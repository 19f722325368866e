//! Upload error types

use std::time::Duration;
use thiserror::Error;

/// Upload error type
#[derive(Error, Debug)]
pub enum UploadError {
    /// Server rejected the blob as too large (HTTP 413)
    #[error("File too large for server limits")]
    TooLarge,

    /// Server rejected the request as malformed (HTTP 400)
    #[error("Invalid request - file may be corrupted")]
    BadRequest,

    /// Authorization failed (HTTP 401/403)
    #[error("Authorization failed - please try logging in again")]
    Unauthorized,

    /// Any other non-success HTTP status
    #[error("Upload failed with status {0}")]
    Status(u16),

    /// Transport-level failure
    #[error("Network error during upload: {0}")]
    Network(String),

    /// Upload exceeded its deadline
    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    /// Upload cancelled by the caller's token
    #[error("Upload was cancelled")]
    Aborted,

    /// Server response was not a usable blob descriptor
    #[error("Invalid blob descriptor from server: {0}")]
    InvalidDescriptor(String),

    /// Signing the authorization event failed
    #[error("Authorization signing failed: {0}")]
    Auth(#[from] nostr_client::ClientError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid upload URL
    #[error("Invalid upload URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Upload result type
pub type Result<T> = std::result::Result<T, UploadError>;
