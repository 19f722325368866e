//! Request-keyed query cache with staleness windows and optimistic mutations
//!
//! Every feature query is cached under a request key (`["reactions", <id>]`,
//! `["videos"]`, …). Entries stay valid for a per-request staleness window;
//! within the window reads are served from memory, after it the next read
//! refetches. Concurrent reads of the same key coalesce into one fetch.
//!
//! Optimistic mutations use per-key generations: `begin_mutation` stamps a
//! new generation, and patches, rollbacks, and delayed invalidations only
//! apply while that generation is still the latest. A newer mutation on the
//! same key silently wins over the older one's deferred work, so rapid
//! toggles are last-write-wins. Atomicity is per key; there are no cross-key
//! transactions.

use crate::error::Result;
use nostr_core::Event;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// A request key: the list-of-strings identity of one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    events: Vec<Event>,
    fetched_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.ttl
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<CacheKey, Entry>,
    /// Mutation generations survive invalidation so stale deferred work from
    /// an earlier mutation can never apply to a later one's data.
    generations: HashMap<CacheKey, u64>,
}

/// Shared in-memory query cache. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<Mutex<State>>,
    inflight: Arc<Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached events for a key if still inside the staleness window.
    pub async fn get_fresh(&self, key: &CacheKey) -> Option<Vec<Event>> {
        let state = self.state.lock().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.events.clone())
    }

    /// Cached events for a key regardless of freshness.
    pub async fn snapshot(&self, key: &CacheKey) -> Option<Vec<Event>> {
        let state = self.state.lock().await;
        state.entries.get(key).map(|entry| entry.events.clone())
    }

    /// Store events under a key with the given staleness window.
    pub async fn set(&self, key: &CacheKey, events: Vec<Event>, ttl: Duration) {
        let mut state = self.state.lock().await;
        state.entries.insert(
            key.clone(),
            Entry {
                events,
                fetched_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Drop a key's entry so the next read refetches.
    pub async fn invalidate(&self, key: &CacheKey) {
        debug!(key = ?key.parts(), "invalidating cache entry");
        let mut state = self.state.lock().await;
        state.entries.remove(key);
    }

    /// Serve from cache inside the staleness window, otherwise fetch and
    /// store. Concurrent callers for the same key share one fetch.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Vec<Event>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Event>>>,
    {
        if let Some(events) = self.get_fresh(key).await {
            return Ok(events);
        }

        let gate = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = gate.lock().await;

        // A coalesced caller may have filled the entry while we waited.
        if let Some(events) = self.get_fresh(key).await {
            return Ok(events);
        }

        debug!(key = ?key.parts(), "cache miss, fetching");
        let result = fetch().await;
        if let Ok(events) = &result {
            self.set(key, events.clone(), ttl).await;
        }

        {
            let mut inflight = self.inflight.lock().await;
            inflight.remove(key);
        }

        result
    }

    /// Start a mutation on a key, invalidating any older mutation's pending
    /// patches and deferred invalidations. Returns the new generation.
    pub async fn begin_mutation(&self, key: &CacheKey) -> u64 {
        let mut state = self.state.lock().await;
        let generation = state.generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Apply an in-place patch to a key's events, but only if `generation` is
    /// still the latest mutation on that key and an entry exists. Returns
    /// whether the patch applied.
    pub async fn patch_if_current<F>(&self, key: &CacheKey, generation: u64, patch: F) -> bool
    where
        F: FnOnce(&mut Vec<Event>),
    {
        let mut state = self.state.lock().await;
        if state.generations.get(key).copied().unwrap_or(0) != generation {
            debug!(key = ?key.parts(), generation, "skipping patch from superseded mutation");
            return false;
        }
        match state.entries.get_mut(key) {
            Some(entry) => {
                patch(&mut entry.events);
                true
            }
            None => false,
        }
    }

    /// Invalidate a key, but only if `generation` is still the latest
    /// mutation on it. Returns whether the invalidation applied.
    pub async fn invalidate_if_current(&self, key: &CacheKey, generation: u64) -> bool {
        let mut state = self.state.lock().await;
        if state.generations.get(key).copied().unwrap_or(0) != generation {
            debug!(key = ?key.parts(), generation, "skipping invalidation from superseded mutation");
            return false;
        }
        state.entries.remove(key);
        true
    }
}
