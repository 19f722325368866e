//! Blob descriptors returned by the server after an upload

use crate::error::{Result, UploadError};
use serde::{Deserialize, Serialize};

/// BUD-02 blob descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescriptor {
    /// Public URL of the stored blob
    pub url: String,
    /// Server-computed SHA-256 of the blob
    pub sha256: String,
    /// Blob size in bytes
    #[serde(default)]
    pub size: u64,
    /// MIME type, if the server recorded one
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    /// Upload timestamp (unix seconds)
    #[serde(default)]
    pub uploaded: u64,
}

impl BlobDescriptor {
    /// Parse a server response body, requiring the fields the app depends on.
    pub fn from_json(body: &str) -> Result<Self> {
        let descriptor: Self = serde_json::from_str(body)
            .map_err(|e| UploadError::InvalidDescriptor(e.to_string()))?;
        if descriptor.url.is_empty() || descriptor.sha256.is_empty() {
            return Err(UploadError::InvalidDescriptor(
                "missing url or sha256".to_string(),
            ));
        }
        Ok(descriptor)
    }

    /// NIP-94-style tags for embedding the blob into an event, plus a
    /// `service` marker. `fallback_mime` fills in when the server omitted the
    /// type.
    pub fn to_tags(&self, fallback_mime: &str) -> Vec<Vec<String>> {
        let mime = self
            .mime_type
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if fallback_mime.is_empty() {
                    "application/octet-stream".to_string()
                } else {
                    fallback_mime.to_string()
                }
            });
        vec![
            vec!["url".to_string(), self.url.clone()],
            vec!["x".to_string(), self.sha256.clone()],
            vec!["size".to_string(), self.size.to_string()],
            vec!["m".to_string(), mime],
            vec!["service".to_string(), "blossom".to_string()],
        ]
    }
}
