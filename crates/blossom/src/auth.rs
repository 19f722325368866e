//! BUD-02 upload authorization
//!
//! Each upload carries a signed kind 24242 event in the `Authorization`
//! header, base64-encoded. The event commits to the blob's SHA-256 and
//! expires an hour after creation, so a leaked header cannot be replayed to
//! upload other content later.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use nostr_core::{Event, EventTemplate, KIND_BLOB_AUTH};
use sha2::{Digest, Sha256};

/// Event kind for Blossom upload authorization
pub const UPLOAD_AUTH_KIND: u16 = KIND_BLOB_AUTH;

/// Authorization lifetime in seconds
pub const AUTH_EXPIRATION_SECS: u64 = 3600;

/// Lowercase hex SHA-256 of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Build the unsigned authorization event for one upload.
pub fn upload_auth_template(file_name: &str, sha256: &str, now: u64) -> EventTemplate {
    EventTemplate {
        created_at: now,
        kind: UPLOAD_AUTH_KIND,
        tags: vec![
            vec!["t".to_string(), "upload".to_string()],
            vec!["x".to_string(), sha256.to_string()],
            vec![
                "expiration".to_string(),
                (now + AUTH_EXPIRATION_SECS).to_string(),
            ],
        ],
        content: format!("Upload {}", file_name),
    }
}

/// Render a signed authorization event as the `Authorization` header value:
/// `Nostr <base64(event JSON)>`.
pub fn authorization_header(event: &Event) -> Result<String> {
    let json = serde_json::to_string(event)?;
    Ok(format!("Nostr {}", BASE64.encode(json.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_upload_auth_template() {
        let template = upload_auth_template("vlog.mp4", "abc123", 1700000000);
        assert_eq!(template.kind, 24242);
        assert_eq!(template.content, "Upload vlog.mp4");
        assert_eq!(template.created_at, 1700000000);
        assert_eq!(
            template.tags,
            vec![
                vec!["t".to_string(), "upload".to_string()],
                vec!["x".to_string(), "abc123".to_string()],
                vec!["expiration".to_string(), "1700003600".to_string()],
            ]
        );
    }

    #[test]
    fn test_authorization_header() {
        let event = Event {
            id: "id1".to_string(),
            pubkey: "pk1".to_string(),
            created_at: 1700000000,
            kind: UPLOAD_AUTH_KIND,
            tags: vec![],
            content: "Upload vlog.mp4".to_string(),
            sig: "sig1".to_string(),
        };
        let header = authorization_header(&event).unwrap();
        let encoded = header.strip_prefix("Nostr ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let round_trip: Event = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(round_trip, event);
    }
}
