//! NIP-01: Basic protocol flow description.
//!
//! This module implements the core Nostr event structure and operations:
//! - Event structure (id, pubkey, created_at, kind, tags, content, sig)
//! - Event serialization for hashing
//! - Event id computation (SHA-256 of the canonical serialization)
//! - Kind classification (regular, replaceable, ephemeral, addressable)
//! - Addressable event coordinates (`<kind>:<pubkey>:<d-tag>`)
//!
//! Signing and signature verification are deliberately not implemented here;
//! Vlogstr talks to a signer through the `Signer` trait in `nostr-client`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Kind 0: profile metadata (replaceable)
pub const KIND_METADATA: u16 = 0;
/// Kind 1: short text note
pub const KIND_SHORT_TEXT_NOTE: u16 = 1;
/// Kind 3: contact list (replaceable)
pub const KIND_CONTACTS: u16 = 3;
/// Kind 5: event deletion request (NIP-09)
pub const KIND_DELETION: u16 = 5;
/// Kind 7: reaction (NIP-25)
pub const KIND_REACTION: u16 = 7;
/// Kind 1111: threaded comment (NIP-22)
pub const KIND_COMMENT: u16 = 1111;
/// Kind 21: normal (long-form) video event (NIP-71)
pub const KIND_VIDEO: u16 = 21;
/// Kind 22: short-form video event (NIP-71)
pub const KIND_SHORT_VIDEO: u16 = 22;
/// Kind 24242: Blossom upload authorization (BUD-02)
pub const KIND_BLOB_AUTH: u16 = 24242;
/// Kind 30078: arbitrary application data (NIP-78, addressable)
pub const KIND_APP_DATA: u16 = 30078;

/// Tag name for the addressable-event identifier
pub const D_TAG: &str = "d";

/// Errors that can occur during NIP-01 operations.
#[derive(Debug, Error)]
pub enum Nip01Error {
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid address format: {0}")]
    InvalidAddress(String),
}

/// A signed Nostr event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 32-bytes lowercase hex-encoded sha256 of the serialized event data
    pub id: String,
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind (integer between 0 and 65535)
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// 64-bytes lowercase hex signature
    pub sig: String,
}

impl Event {
    /// First value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.first().map(|s| s.as_str()) == Some(name))
            .and_then(|tag| tag.get(1))
            .map(|s| s.as_str())
    }

    /// All first values of tags with the given name.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(|s| s.as_str()) == Some(name))
            .filter_map(|tag| tag.get(1))
            .map(|s| s.as_str())
    }

    /// The `d` tag value, relevant for addressable events.
    pub fn d_tag(&self) -> Option<&str> {
        self.tag_value(D_TAG)
    }
}

/// An unsigned event (before signing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
}

/// A template for creating events (without pubkey, which comes from the signer).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventTemplate {
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
}

impl EventTemplate {
    /// Attach the author pubkey, producing an event ready for id computation.
    pub fn into_unsigned(self, pubkey: impl Into<String>) -> UnsignedEvent {
        UnsignedEvent {
            pubkey: pubkey.into(),
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
        }
    }
}

/// Classification of an event kind per NIP-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClassification {
    /// Stored by relays indefinitely
    Regular,
    /// Only the latest event per (pubkey, kind) is kept
    Replaceable,
    /// Not expected to be stored at all
    Ephemeral,
    /// Only the latest event per (pubkey, kind, d-tag) is kept
    Addressable,
}

/// Classify an event kind.
pub fn classify_kind(kind: u16) -> KindClassification {
    if is_replaceable_kind(kind) {
        KindClassification::Replaceable
    } else if is_ephemeral_kind(kind) {
        KindClassification::Ephemeral
    } else if is_addressable_kind(kind) {
        KindClassification::Addressable
    } else {
        KindClassification::Regular
    }
}

/// Check if a kind is replaceable (0, 3, or 10000-19999).
pub fn is_replaceable_kind(kind: u16) -> bool {
    kind == 0 || kind == 3 || (10000..20000).contains(&kind)
}

/// Check if a kind is ephemeral (20000-29999).
pub fn is_ephemeral_kind(kind: u16) -> bool {
    (20000..30000).contains(&kind)
}

/// Check if a kind is addressable (30000-39999).
pub fn is_addressable_kind(kind: u16) -> bool {
    (30000..40000).contains(&kind)
}

/// Check if a kind is regular (neither replaceable, ephemeral, nor addressable).
pub fn is_regular_kind(kind: u16) -> bool {
    classify_kind(kind) == KindClassification::Regular
}

/// Serialize an unsigned event into the canonical form used for hashing:
/// `[0, pubkey, created_at, kind, tags, content]`
pub fn serialize_event(event: &UnsignedEvent) -> Result<String, Nip01Error> {
    let value = serde_json::json!([
        0,
        event.pubkey,
        event.created_at,
        event.kind,
        event.tags,
        event.content,
    ]);
    serde_json::to_string(&value).map_err(|e| Nip01Error::Serialization(e.to_string()))
}

/// Compute the event id: lowercase hex SHA-256 of the canonical serialization.
pub fn get_event_hash(event: &UnsignedEvent) -> Result<String, Nip01Error> {
    let serialized = serialize_event(event)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Validate the structural fields of an unsigned event.
///
/// Checks hex encoding and length of the pubkey and basic tag shape. Does not
/// verify signatures (no crypto in this crate).
pub fn validate_unsigned_event(event: &UnsignedEvent) -> Result<(), Nip01Error> {
    if event.pubkey.len() != 64 {
        return Err(Nip01Error::InvalidEvent(format!(
            "pubkey must be 64 hex chars, got {}",
            event.pubkey.len()
        )));
    }
    if hex::decode(&event.pubkey).is_err() {
        return Err(Nip01Error::InvalidHex(event.pubkey.clone()));
    }
    for tag in &event.tags {
        if tag.is_empty() {
            return Err(Nip01Error::InvalidEvent("empty tag".to_string()));
        }
    }
    Ok(())
}

/// Sort events by creation time, newest first. Ties break on event id so the
/// order is stable across relays.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Create an address string for an addressable or replaceable event.
///
/// The address format is `<kind>:<pubkey>:<d-tag-value>`; replaceable events
/// use an empty d-tag component.
pub fn create_address(kind: u16, pubkey: &str, d_tag: &str) -> String {
    format!("{}:{}:{}", kind, pubkey, d_tag)
}

/// Parse an address string into `(kind, pubkey, d_tag)`.
pub fn parse_address(address: &str) -> Result<(u16, String, String), Nip01Error> {
    let mut parts = address.splitn(3, ':');
    let kind = parts
        .next()
        .ok_or_else(|| Nip01Error::InvalidAddress(address.to_string()))?
        .parse::<u16>()
        .map_err(|_| Nip01Error::InvalidAddress(address.to_string()))?;
    let pubkey = parts
        .next()
        .ok_or_else(|| Nip01Error::InvalidAddress(address.to_string()))?
        .to_string();
    let d_tag = parts.next().unwrap_or("").to_string();
    Ok((kind, pubkey, d_tag))
}
