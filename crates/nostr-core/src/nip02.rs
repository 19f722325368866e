//! NIP-02: Follow List (Contact List and Petnames)
//!
//! Defines how users publish their follow lists as kind 3 events. Each
//! followed profile is represented by a "p" tag with optional relay URL and
//! petname. Contact lists are replaceable: only the most recent kind 3 event
//! per author is authoritative.
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/02.md>

use crate::nip01::{Event, KIND_CONTACTS};
use thiserror::Error;

/// Event kind for contact lists
pub const CONTACT_LIST_KIND: u16 = KIND_CONTACTS;

/// Errors that can occur during NIP-02 operations
#[derive(Debug, Error)]
pub enum Nip02Error {
    #[error("invalid event kind: expected 3, got {0}")]
    InvalidKind(u16),

    #[error("invalid p tag: {0}")]
    InvalidTag(String),
}

/// A single followed profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Followed profile's public key (hex)
    pub pubkey: String,
    /// Relay where the profile can be found (optional)
    pub relay_url: Option<String>,
    /// Local petname for the profile (optional)
    pub petname: Option<String>,
}

impl Contact {
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            relay_url: None,
            petname: None,
        }
    }

    /// Render as a "p" tag.
    pub fn to_tag(&self) -> Vec<String> {
        let mut tag = vec!["p".to_string(), self.pubkey.clone()];
        match (&self.relay_url, &self.petname) {
            (Some(relay), Some(petname)) => {
                tag.push(relay.clone());
                tag.push(petname.clone());
            }
            (Some(relay), None) => tag.push(relay.clone()),
            (None, Some(petname)) => {
                // Petname occupies the fourth slot; relay slot stays empty.
                tag.push(String::new());
                tag.push(petname.clone());
            }
            (None, None) => {}
        }
        tag
    }
}

/// A parsed contact list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
}

impl ContactList {
    /// Parse a contact list from a kind 3 event.
    ///
    /// Tags other than "p" are ignored; malformed "p" tags (no pubkey) are
    /// skipped rather than failing the whole list.
    pub fn from_event(event: &Event) -> Result<Self, Nip02Error> {
        if event.kind != CONTACT_LIST_KIND {
            return Err(Nip02Error::InvalidKind(event.kind));
        }

        let contacts = event
            .tags
            .iter()
            .filter(|tag| tag.first().map(|s| s.as_str()) == Some("p"))
            .filter_map(|tag| {
                let pubkey = tag.get(1)?;
                if pubkey.is_empty() {
                    return None;
                }
                Some(Contact {
                    pubkey: pubkey.clone(),
                    relay_url: tag.get(2).filter(|s| !s.is_empty()).cloned(),
                    petname: tag.get(3).filter(|s| !s.is_empty()).cloned(),
                })
            })
            .collect();

        Ok(Self { contacts })
    }

    /// All followed pubkeys, in list order.
    pub fn pubkeys(&self) -> Vec<String> {
        self.contacts.iter().map(|c| c.pubkey.clone()).collect()
    }

    /// Whether the list contains the given pubkey.
    pub fn contains(&self, pubkey: &str) -> bool {
        self.contacts.iter().any(|c| c.pubkey == pubkey)
    }

    /// Add a followed pubkey if not already present.
    pub fn follow(&mut self, pubkey: impl Into<String>) {
        let pubkey = pubkey.into();
        if !self.contains(&pubkey) {
            self.contacts.push(Contact::new(pubkey));
        }
    }

    /// Remove a followed pubkey.
    pub fn unfollow(&mut self, pubkey: &str) {
        self.contacts.retain(|c| c.pubkey != pubkey);
    }

    /// Render the tag set for the replacement kind 3 event.
    pub fn to_tags(&self) -> Vec<Vec<String>> {
        self.contacts.iter().map(|c| c.to_tag()).collect()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
