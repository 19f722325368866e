//! The `NostrClient` and `Signer` trait seams
//!
//! Relay transport and key custody both live behind traits: the services only
//! know how to query, publish, and ask a signer for a signature. Production
//! wires a real relay client and browser/hardware signer in; tests wire in
//! `MemoryRelay` and a stub signer.

use crate::cancel::QueryOptions;
use crate::error::Result;
use crate::filter::Filter;
use async_trait::async_trait;
use nostr_core::{Event, EventTemplate};

/// Query and publish access to the relay set.
#[async_trait]
pub trait NostrClient: Send + Sync {
    /// Run a bounded query. Results are the union of events matching any of
    /// the filters, deduplicated by id.
    async fn query(&self, filters: Vec<Filter>, options: &QueryOptions) -> Result<Vec<Event>>;

    /// Publish a signed event.
    async fn publish(&self, event: Event) -> Result<()>;
}

/// Event signing, without exposing key material.
///
/// Implementations compute or verify the event id as they see fit; the stub
/// signer in tests uses `nostr_core::get_event_hash` and a fake signature.
#[async_trait]
pub trait Signer: Send + Sync {
    /// The signing identity's public key (lowercase hex).
    fn pubkey(&self) -> String;

    /// Attach pubkey, id, and signature to a template.
    async fn sign(&self, template: EventTemplate) -> Result<Event>;
}
