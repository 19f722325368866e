//! NIP-78: Arbitrary custom app data
//!
//! Kind 30078 addressable events let an application store its own data on
//! relays, namespaced by the `d` tag. Vlogstr keeps per-user settings here as
//! a JSON document; because the kind is addressable, publishing a new event
//! with the same `d` tag replaces the previous one.
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/78.md>

use crate::nip01::{Event, KIND_APP_DATA};
use thiserror::Error;

/// Event kind for application-specific data
pub const APP_DATA_KIND: u16 = KIND_APP_DATA;

/// Errors that can occur during NIP-78 operations
#[derive(Debug, Error)]
pub enum Nip78Error {
    #[error("invalid event kind: expected 30078, got {0}")]
    InvalidKind(u16),

    #[error("app data event is missing a d tag")]
    MissingIdentifier,
}

/// Check whether an event is an app data event.
pub fn is_app_data(event: &Event) -> bool {
    event.kind == APP_DATA_KIND
}

/// The `d` tag identifier of an app data event.
pub fn get_identifier(event: &Event) -> Result<&str, Nip78Error> {
    if event.kind != APP_DATA_KIND {
        return Err(Nip78Error::InvalidKind(event.kind));
    }
    event.d_tag().ok_or(Nip78Error::MissingIdentifier)
}

/// Whether an app data event carries the given identifier.
pub fn has_identifier(event: &Event, identifier: &str) -> bool {
    is_app_data(event) && event.d_tag() == Some(identifier)
}

/// Build the base tag set for an app data event: `["d", <identifier>]` plus an
/// optional human-readable `["title", …]`.
pub fn create_app_data_tags(identifier: &str, title: Option<&str>) -> Vec<Vec<String>> {
    let mut tags = vec![vec!["d".to_string(), identifier.to_string()]];
    if let Some(title) = title {
        tags.push(vec!["title".to_string(), title.to_string()]);
    }
    tags
}
