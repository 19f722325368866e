//! Session wiring
//!
//! A `Session` bundles the client seam, the optional signer, the shared query
//! cache, the notifier, and configuration. Every service takes a `Session` at
//! construction; nothing reaches for globals, so tests assemble a session
//! around `MemoryRelay` and a stub signer.

use crate::config::AppConfig;
use crate::notify::Notifier;
use nostr_client::{
    ClientError, Filter, NostrClient, QueryCache, QueryOptions, Result, Signer, run_with_options,
};
use nostr_core::{Event, EventTemplate};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Shared application context. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    pub client: Arc<dyn NostrClient>,
    pub signer: Option<Arc<dyn Signer>>,
    pub cache: QueryCache,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

impl Session {
    pub fn new(
        client: Arc<dyn NostrClient>,
        signer: Option<Arc<dyn Signer>>,
        notifier: Arc<dyn Notifier>,
        config: AppConfig,
    ) -> Self {
        Self {
            client,
            signer,
            cache: QueryCache::new(),
            notifier,
            config: Arc::new(config),
        }
    }

    /// The signed-in user's pubkey, if any.
    pub fn pubkey(&self) -> Option<String> {
        self.signer.as_ref().map(|s| s.pubkey())
    }

    /// The signer, or `NotSignedIn`.
    pub fn require_signer(&self) -> Result<&Arc<dyn Signer>> {
        self.signer.as_ref().ok_or(ClientError::NotSignedIn)
    }

    /// Run a query under a deadline, regardless of whether the underlying
    /// client enforces one itself.
    pub async fn query(&self, filters: Vec<Filter>, timeout: Duration) -> Result<Vec<Event>> {
        let options = QueryOptions::with_timeout(timeout);
        run_with_options(&options, self.client.query(filters, &options)).await
    }

    /// Sign a template and publish the resulting event.
    pub async fn publish(&self, template: EventTemplate) -> Result<Event> {
        let signer = self.require_signer()?;
        let event = signer.sign(template).await?;
        debug!(kind = event.kind, id = %event.id, "publishing event");
        self.client.publish(event.clone()).await?;
        Ok(event)
    }

    /// Current unix time in seconds.
    pub fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Current unix time in milliseconds, for synthetic optimistic ids.
    pub fn now_millis(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }
}
