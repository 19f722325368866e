//! NIP-09: Event Deletion Request
//!
//! A kind 5 event asks relays and clients to hide or delete previously
//! published events. Deletion requests are advisory: relays may ignore them,
//! and a request never guarantees removal everywhere. The application treats
//! deletions as the only way to retract immutable events (videos, reactions);
//! nothing is ever mutated in place.
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/09.md>

use crate::nip01::{Event, KIND_DELETION};
use thiserror::Error;

/// Event kind for deletion requests
pub const DELETION_REQUEST_KIND: u16 = KIND_DELETION;

/// Errors that can occur during NIP-09 operations
#[derive(Debug, Error)]
pub enum Nip09Error {
    #[error("invalid event kind: expected 5, got {0}")]
    InvalidKind(u16),

    #[error("deletion request references no events")]
    NoTargets,
}

/// Check whether an event is a deletion request.
pub fn is_deletion_request(event: &Event) -> bool {
    event.kind == DELETION_REQUEST_KIND
}

/// Build the tag set for a deletion request.
///
/// Each deleted event id becomes an "e" tag; each kind being retracted becomes
/// a "k" tag so relays can cheaply decide whether the request is relevant.
pub fn create_deletion_tags(event_ids: &[String], kinds: &[u16]) -> Vec<Vec<String>> {
    let mut tags: Vec<Vec<String>> = event_ids
        .iter()
        .map(|id| vec!["e".to_string(), id.clone()])
        .collect();
    for kind in kinds {
        tags.push(vec!["k".to_string(), kind.to_string()]);
    }
    tags
}

/// Build the tag set for deleting addressable events by coordinate.
pub fn create_deletion_tags_for_addresses(addresses: &[String]) -> Vec<Vec<String>> {
    addresses
        .iter()
        .map(|address| vec!["a".to_string(), address.clone()])
        .collect()
}

/// Event ids referenced by a deletion request.
pub fn get_deleted_event_ids(event: &Event) -> Vec<String> {
    event.tag_values("e").map(|s| s.to_string()).collect()
}

/// Addressable coordinates referenced by a deletion request.
pub fn get_deleted_addresses(event: &Event) -> Vec<String> {
    event.tag_values("a").map(|s| s.to_string()).collect()
}

/// Kinds referenced by a deletion request.
pub fn get_deleted_kinds(event: &Event) -> Vec<u16> {
    event
        .tag_values("k")
        .filter_map(|s| s.parse::<u16>().ok())
        .collect()
}

/// Human-readable reason attached to a deletion request, if any.
pub fn get_deletion_reason(event: &Event) -> Option<&str> {
    if event.content.is_empty() {
        None
    } else {
        Some(&event.content)
    }
}

/// Whether `target` should be treated as deleted given a deletion request.
///
/// Only the author may delete their own events; a deletion request from a
/// different pubkey never applies.
pub fn should_delete_event(deletion: &Event, target: &Event) -> Result<bool, Nip09Error> {
    if !is_deletion_request(deletion) {
        return Err(Nip09Error::InvalidKind(deletion.kind));
    }
    if deletion.pubkey != target.pubkey {
        return Ok(false);
    }
    Ok(get_deleted_event_ids(deletion).iter().any(|id| id == &target.id))
}
