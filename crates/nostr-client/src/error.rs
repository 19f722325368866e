//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query exceeded its deadline
    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Query cancelled by the caller's token
    #[error("Operation cancelled")]
    Cancelled,

    /// Event publish failed
    #[error("Event publish failed: {0}")]
    PublishFailed(String),

    /// Operation requires a signer but none is attached
    #[error("Not signed in")]
    NotSignedIn,

    /// Invalid event
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<nostr_core::Nip01Error> for ClientError {
    fn from(err: nostr_core::Nip01Error) -> Self {
        ClientError::InvalidEvent(err.to_string())
    }
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;
