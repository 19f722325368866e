//! Shared fixtures: an in-memory relay, a stub signer, and a collecting
//! notifier wired into a session.
#![allow(dead_code)]

use async_trait::async_trait;
use nostr_client::{MemoryRelay, Result, Signer};
use nostr_core::{Event, EventTemplate, get_event_hash};
use std::sync::Arc;
use vlogstr::{AppConfig, CollectingNotifier, Session};

/// Signer that hashes the event like a real one but fakes the signature.
pub struct StubSigner {
    pubkey: String,
}

impl StubSigner {
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
        }
    }
}

#[async_trait]
impl Signer for StubSigner {
    fn pubkey(&self) -> String {
        self.pubkey.clone()
    }

    async fn sign(&self, template: EventTemplate) -> Result<Event> {
        let unsigned = template.into_unsigned(self.pubkey.clone());
        let id = get_event_hash(&unsigned)?;
        Ok(Event {
            id,
            pubkey: unsigned.pubkey,
            created_at: unsigned.created_at,
            kind: unsigned.kind,
            tags: unsigned.tags,
            content: unsigned.content,
            sig: "test-signature".to_string(),
        })
    }
}

pub struct TestApp {
    pub relay: MemoryRelay,
    pub session: Session,
    pub notifier: Arc<CollectingNotifier>,
}

/// Session signed in as `pubkey`.
pub fn signed_in(pubkey: &str) -> TestApp {
    let relay = MemoryRelay::new();
    let notifier = CollectingNotifier::new();
    let session = Session::new(
        Arc::new(relay.clone()),
        Some(Arc::new(StubSigner::new(pubkey))),
        notifier.clone(),
        AppConfig::default(),
    );
    TestApp {
        relay,
        session,
        notifier,
    }
}

/// Session with no signer.
pub fn signed_out() -> TestApp {
    let relay = MemoryRelay::new();
    let notifier = CollectingNotifier::new();
    let session = Session::new(
        Arc::new(relay.clone()),
        None,
        notifier.clone(),
        AppConfig::default(),
    );
    TestApp {
        relay,
        session,
        notifier,
    }
}

/// A bare event for seeding the relay.
pub fn seed_event(id: &str, pubkey: &str, kind: u16, created_at: u64) -> Event {
    Event {
        id: id.to_string(),
        pubkey: pubkey.to_string(),
        created_at,
        kind,
        tags: vec![],
        content: String::new(),
        sig: "sig".to_string(),
    }
}
