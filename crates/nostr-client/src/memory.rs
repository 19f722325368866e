//! In-memory relay used as a test double
//!
//! `MemoryRelay` implements `NostrClient` over a plain `Vec<Event>` with the
//! same storage semantics a relay applies on insert: replaceable kinds keep
//! only the newest event per `(pubkey, kind)` and addressable kinds per
//! `(pubkey, kind, d)`. Queries run full filter matching. Kind-5 deletion
//! requests are stored like any other event and do not hide their targets;
//! the relay is advisory and callers filter client-side where they care.

use crate::cancel::QueryOptions;
use crate::client::NostrClient;
use crate::error::{ClientError, Result};
use crate::filter::Filter;
use async_trait::async_trait;
use nostr_core::{Event, is_addressable_kind, is_replaceable_kind, sort_events};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    events: Vec<Event>,
    fail_publishes: bool,
}

/// In-memory `NostrClient` implementation. Clones share storage.
#[derive(Clone, Default)]
pub struct MemoryRelay {
    state: Arc<Mutex<State>>,
}

impl MemoryRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an event without going through `publish`.
    pub async fn insert(&self, event: Event) {
        let mut state = self.state.lock().await;
        Self::store(&mut state.events, event);
    }

    /// Make subsequent `publish` calls fail, for error-path tests.
    pub async fn set_publish_failure(&self, fail: bool) {
        self.state.lock().await.fail_publishes = fail;
    }

    /// Every stored event, newest first.
    pub async fn all_events(&self) -> Vec<Event> {
        let mut events = self.state.lock().await.events.clone();
        sort_events(&mut events);
        events
    }

    /// Stored events of one kind, newest first.
    pub async fn events_of_kind(&self, kind: u16) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .state
            .lock()
            .await
            .events
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect();
        sort_events(&mut events);
        events
    }

    fn store(events: &mut Vec<Event>, event: Event) {
        if is_replaceable_kind(event.kind) {
            if let Some(existing) = events
                .iter()
                .position(|e| e.pubkey == event.pubkey && e.kind == event.kind)
            {
                if events[existing].created_at > event.created_at {
                    return;
                }
                events.remove(existing);
            }
        } else if is_addressable_kind(event.kind) {
            let d = event.d_tag().unwrap_or("").to_string();
            if let Some(existing) = events.iter().position(|e| {
                e.pubkey == event.pubkey
                    && e.kind == event.kind
                    && e.d_tag().unwrap_or("") == d
            }) {
                if events[existing].created_at > event.created_at {
                    return;
                }
                events.remove(existing);
            }
        } else if events.iter().any(|e| e.id == event.id) {
            return;
        }
        events.push(event);
    }
}

#[async_trait]
impl NostrClient for MemoryRelay {
    async fn query(&self, filters: Vec<Filter>, _options: &QueryOptions) -> Result<Vec<Event>> {
        let state = self.state.lock().await;
        let mut results: Vec<Event> = Vec::new();

        for filter in &filters {
            let mut matched: Vec<Event> = state
                .events
                .iter()
                .filter(|event| filter.matches(event))
                .cloned()
                .collect();
            sort_events(&mut matched);
            if let Some(limit) = filter.limit {
                matched.truncate(limit as usize);
            }
            for event in matched {
                if !results.iter().any(|e| e.id == event.id) {
                    results.push(event);
                }
            }
        }

        sort_events(&mut results);
        Ok(results)
    }

    async fn publish(&self, event: Event) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fail_publishes {
            return Err(ClientError::PublishFailed("relay rejected event".to_string()));
        }
        Self::store(&mut state.events, event);
        Ok(())
    }
}
